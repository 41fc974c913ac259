use super::*;

#[test]
fn no_command_is_none() {
    let cli = Cli::try_parse_from(["grubline"]).expect("expected valid cli args");
    assert!(cli.command.is_none());
}

#[test]
fn parses_restaurants_without_filter() {
    let cli = Cli::try_parse_from(["grubline", "restaurants"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Restaurants {
            query: None,
            json: false
        })
    ));
}

#[test]
fn parses_restaurants_with_query_and_json() {
    let cli =
        Cli::try_parse_from(["grubline", "restaurants", "--query", "on da", "--json"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Restaurants {
            query: Some(ref q),
            json: true
        }) if q == "on da"
    ));
}

#[test]
fn parses_menu_with_id() {
    let cli = Cli::try_parse_from(["grubline", "menu", "229"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Menu {
            ref id,
            expand: false,
            json: false
        }) if id == "229"
    ));
}

#[test]
fn parses_menu_expand_flag() {
    let cli = Cli::try_parse_from(["grubline", "menu", "229", "--expand"]).unwrap();
    assert!(matches!(
        cli.command,
        Some(Commands::Menu { expand: true, .. })
    ));
}

#[test]
fn menu_requires_id() {
    let result = Cli::try_parse_from(["grubline", "menu"]);
    assert!(result.is_err(), "menu without an id should fail to parse");
}

#[test]
fn parses_browse() {
    let cli = Cli::try_parse_from(["grubline", "browse"]).unwrap();
    assert!(matches!(cli.command, Some(Commands::Browse)));
}

#[test]
fn rejects_unknown_subcommand() {
    assert!(Cli::try_parse_from(["grubline", "order"]).is_err());
}
