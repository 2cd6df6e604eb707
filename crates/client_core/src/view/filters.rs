use shared::domain::FilterType;

use crate::render::{NodeId, View};

pub struct FilterView {
    current: FilterType,
    availability: Vec<(FilterType, bool)>,
    element: Option<NodeId>,
}

impl FilterView {
    pub fn new(current: FilterType, availability: Vec<(FilterType, bool)>) -> Self {
        Self {
            current,
            availability,
            element: None,
        }
    }

    pub fn current(&self) -> FilterType {
        self.current
    }

    /// A filter with no matching events cannot be picked, unless it is the
    /// one already selected.
    pub fn is_enabled(&self, filter: FilterType) -> bool {
        filter == self.current
            || self
                .availability
                .iter()
                .any(|(candidate, available)| *candidate == filter && *available)
    }
}

impl View for FilterView {
    fn template(&self) -> String {
        let items: Vec<String> = FilterType::ALL
            .into_iter()
            .map(|filter| {
                if filter == self.current {
                    format!("[{filter}]")
                } else if self.is_enabled(filter) {
                    filter.to_string()
                } else {
                    format!("{filter}(disabled)")
                }
            })
            .collect();
        format!("filters: {}", items.join(" "))
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_without_events_are_disabled_except_the_current_one() {
        let view = FilterView::new(
            FilterType::Past,
            vec![
                (FilterType::Everything, true),
                (FilterType::Future, false),
                (FilterType::Present, false),
                (FilterType::Past, false),
            ],
        );

        assert!(view.is_enabled(FilterType::Everything));
        assert!(!view.is_enabled(FilterType::Future));
        assert!(view.is_enabled(FilterType::Past));
        assert_eq!(
            view.template(),
            "filters: everything future(disabled) present(disabled) [past]"
        );
    }
}
