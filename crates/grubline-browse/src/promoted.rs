use grubline_core::RestaurantSummary;

pub const PROMOTED_LABEL: &str = "[Promoted]";

/// Wraps a restaurant renderer so that promoted restaurants get a label line
/// above the inner rendering. Non-promoted restaurants render unchanged.
pub fn with_promoted_label<F>(render: F) -> impl Fn(&RestaurantSummary) -> String
where
    F: Fn(&RestaurantSummary) -> String,
{
    move |restaurant: &RestaurantSummary| {
        let inner = render(restaurant);
        if restaurant.promoted {
            format!("{PROMOTED_LABEL}\n{inner}")
        } else {
            inner
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn restaurant(promoted: bool) -> RestaurantSummary {
        RestaurantSummary {
            id: "7".to_owned(),
            name: "Dusk".to_owned(),
            promoted,
            ..RestaurantSummary::default()
        }
    }

    #[test]
    fn labels_only_promoted_restaurants() {
        let render = with_promoted_label(|r: &RestaurantSummary| r.name.clone());
        assert_eq!(render(&restaurant(true)), "[Promoted]\nDusk");
        assert_eq!(render(&restaurant(false)), "Dusk");
    }
}
