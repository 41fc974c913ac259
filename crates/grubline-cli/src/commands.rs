//! One-shot commands: print the listing or a single menu and exit.

use std::process::ExitCode;

use grubline_browse::{filter_by_name, render_menu, render_restaurant_list, ExpandedItems, SearchQuery};
use grubline_catalog::CatalogClient;

/// Print the restaurant listing, filtered by `query` when given.
///
/// # Errors
///
/// Returns an error if the listing cannot be fetched or serialized.
pub(crate) async fn run_restaurants(
    client: &CatalogClient,
    query: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let restaurants = client.fetch_listing().await?;
    let filtered = filter_by_name(&restaurants, &SearchQuery::new(query.unwrap_or_default()));

    if json {
        println!("{}", serde_json::to_string_pretty(&filtered)?);
    } else {
        println!("{}", render_restaurant_list(&filtered));
    }
    Ok(())
}

/// Print one restaurant's menu.
///
/// An unknown restaurant is reported on stderr with a failing exit code
/// rather than as an error.
///
/// # Errors
///
/// Returns an error for any other fetch failure.
pub(crate) async fn run_menu(
    client: &CatalogClient,
    restaurant_id: &str,
    expand: bool,
    json: bool,
    description_limit: usize,
) -> anyhow::Result<ExitCode> {
    let menu = match client.fetch_menu(restaurant_id).await {
        Ok(menu) => menu,
        Err(e) if e.is_not_found() => {
            eprintln!("restaurant not found: {restaurant_id}");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&menu)?);
    } else {
        let limit = if expand { usize::MAX } else { description_limit };
        println!("{}", render_menu(&menu, &ExpandedItems::new(), limit));
    }
    Ok(ExitCode::SUCCESS)
}
