//! Line-driven browsing session.
//!
//! The session keeps two subscriptions for its whole lifetime: one on the
//! restaurant listing and one on the currently open menu. Opening another
//! restaurant only switches the menu subscription's identifier, which
//! cancels a menu request still in flight.

use grubline_browse::{render_menu, render_restaurant_list, ExpandedItems, SearchState};
use grubline_catalog::{
    normalize_listing, normalize_menu, CatalogClient, DocumentSource, FetchError, FetchState,
    Fetcher, Subscription,
};
use grubline_core::{MenuDetail, RestaurantSummary};
use tokio::io::{AsyncBufReadExt, BufReader};

pub(crate) const HELP: &str = "\
commands:
  list              show restaurants matching the current search
  search [text]     filter restaurants by name; no text clears the filter
  open <id>         open a restaurant's menu
  more <item-id> [category-id]
                    expand or collapse an item description; without a
                    category the first listing of the item is toggled
  back              close the menu and return to the list
  reload            re-issue the request for the current view
  help              show this text
  quit              leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum SessionCommand {
    List,
    Search(String),
    Open(String),
    More {
        item_id: String,
        category_id: Option<String>,
    },
    Back,
    Reload,
    Help,
    Quit,
}

impl SessionCommand {
    /// Parses one input line. Blank lines mean `list`.
    pub(crate) fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim();
        let (verb, rest) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

        let require = |what: &str| {
            if rest.is_empty() {
                Err(format!("`{verb}` needs {what}"))
            } else {
                Ok(rest.to_owned())
            }
        };

        match verb {
            "" | "list" | "ls" => Ok(Self::List),
            "search" | "s" => Ok(Self::Search(rest.to_owned())),
            "open" | "o" => require("a restaurant id").map(Self::Open),
            "more" | "m" => require("an item id").map(|args| {
                let mut args = args.split_whitespace().map(str::to_owned);
                Self::More {
                    item_id: args.next().unwrap_or_default(),
                    category_id: args.next(),
                }
            }),
            "back" | "b" => Ok(Self::Back),
            "reload" | "r" => Ok(Self::Reload),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(format!("unknown command `{other}`; type `help`")),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Step {
    Output(String),
    Quit,
}

/// Normalized form of a loaded document and the snapshot generation it was
/// built from.
struct Normalized<T> {
    generation: u64,
    value: T,
}

/// Returns the cached value for `generation`, normalizing again only when the
/// cache was built from another generation.
fn normalized<T>(
    cache: &mut Option<Normalized<T>>,
    generation: u64,
    normalize: impl FnOnce() -> T,
) -> &T {
    if cache.as_ref().is_some_and(|c| c.generation != generation) {
        *cache = None;
    }
    &cache
        .get_or_insert_with(|| Normalized {
            generation,
            value: normalize(),
        })
        .value
}

pub(crate) struct Session<S> {
    client: CatalogClient,
    listing: Subscription<S>,
    menu: Subscription<S>,
    restaurants: Option<Normalized<Vec<RestaurantSummary>>>,
    menu_detail: Option<Normalized<MenuDetail>>,
    search: SearchState,
    expanded: ExpandedItems,
    description_limit: usize,
}

impl<S: DocumentSource> Session<S> {
    /// Subscribes to the listing right away; the menu subscription starts
    /// idle.
    pub(crate) fn new(fetcher: &Fetcher<S>, client: CatalogClient, description_limit: usize) -> Self {
        let listing = fetcher.subscribe(Some(client.listing_resource()));
        let menu = fetcher.subscribe(None);
        Self {
            client,
            listing,
            menu,
            restaurants: None,
            menu_detail: None,
            search: SearchState::default(),
            expanded: ExpandedItems::new(),
            description_limit,
        }
    }

    /// Waits for the listing and renders it.
    pub(crate) async fn start(&mut self) -> String {
        self.listing.settled().await;
        self.render_listing()
    }

    pub(crate) async fn handle(&mut self, command: SessionCommand) -> Step {
        let output = match command {
            SessionCommand::List => self.render_listing(),
            SessionCommand::Search(text) => {
                self.search = std::mem::take(&mut self.search).edit(text).submit();
                self.render_listing()
            }
            SessionCommand::Open(id) => self.open(&id).await,
            SessionCommand::More {
                item_id,
                category_id,
            } => self.toggle_description(&item_id, category_id.as_deref()),
            SessionCommand::Back => {
                self.menu.set_resource(None);
                self.expanded.clear();
                self.render_listing()
            }
            SessionCommand::Reload => {
                if self.menu.resource().is_some() {
                    self.menu.refetch();
                    self.menu.settled().await;
                    self.render_open_menu()
                } else {
                    self.listing.refetch();
                    self.listing.settled().await;
                    self.render_listing()
                }
            }
            SessionCommand::Help => HELP.to_owned(),
            SessionCommand::Quit => return Step::Quit,
        };
        Step::Output(output)
    }

    async fn open(&mut self, restaurant_id: &str) -> String {
        self.menu
            .set_resource(Some(self.client.menu_resource(restaurant_id)));
        self.expanded.clear();
        let snapshot = self.menu.settled().await;

        if snapshot.state.error().is_some_and(FetchError::is_not_found) {
            // Unknown restaurant: drop back to the list.
            self.menu.set_resource(None);
            return format!(
                "restaurant not found: {restaurant_id}\n\n{}",
                self.render_listing()
            );
        }
        self.render_open_menu()
    }

    fn toggle_description(&mut self, item_id: &str, category_id: Option<&str>) -> String {
        let snapshot = self.menu.snapshot();
        let FetchState::Loaded(document) = &snapshot.state else {
            return "no menu is open; use `open <id>` first".to_owned();
        };
        let menu = normalized(&mut self.menu_detail, snapshot.generation, || {
            normalize_menu(document)
        });

        let categories = menu.item_categories(item_id);
        if categories.is_empty() {
            return format!("no item {item_id} on this menu");
        }
        let target = match category_id {
            Some(wanted) => categories.into_iter().find(|c| *c == wanted),
            None => categories.into_iter().next(),
        };
        let Some(category) = target.map(str::to_owned) else {
            return format!(
                "item {item_id} is not listed in category {}",
                category_id.unwrap_or_default()
            );
        };

        self.expanded.toggle(&category, item_id);
        self.render_open_menu()
    }

    fn render_listing(&mut self) -> String {
        let snapshot = self.listing.snapshot();
        match &snapshot.state {
            FetchState::Idle => String::new(),
            FetchState::Loading => "loading restaurants...".to_owned(),
            FetchState::Failed(e) => format!("failed to load restaurants: {e}"),
            FetchState::Loaded(document) => {
                let restaurants = normalized(&mut self.restaurants, snapshot.generation, || {
                    normalize_listing(document)
                });
                render_restaurant_list(&self.search.apply(restaurants))
            }
        }
    }

    fn render_open_menu(&mut self) -> String {
        let snapshot = self.menu.snapshot();
        match &snapshot.state {
            FetchState::Idle => "no menu is open".to_owned(),
            FetchState::Loading => "loading menu...".to_owned(),
            FetchState::Failed(e) => format!("failed to load menu: {e}"),
            FetchState::Loaded(document) => {
                let menu = normalized(&mut self.menu_detail, snapshot.generation, || {
                    normalize_menu(document)
                });
                render_menu(menu, &self.expanded, self.description_limit)
            }
        }
    }
}

/// Runs `session` against stdin until `quit` or end of input.
///
/// # Errors
///
/// Returns an error if reading stdin fails.
pub(crate) async fn run_browse<S: DocumentSource>(mut session: Session<S>) -> anyhow::Result<()> {
    println!("{}", session.start().await);
    println!("type `help` for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match SessionCommand::parse(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{message}");
                continue;
            }
        };
        match session.handle(command).await {
            Step::Output(text) => println!("{text}"),
            Step::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "browse_test.rs"]
mod tests;
