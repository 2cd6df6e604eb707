use shared::domain::SortType;

use crate::render::{NodeId, View};

pub struct SortView {
    current: SortType,
    element: Option<NodeId>,
}

impl SortView {
    pub fn new(current: SortType) -> Self {
        Self {
            current,
            element: None,
        }
    }

    pub fn current(&self) -> SortType {
        self.current
    }
}

impl View for SortView {
    fn template(&self) -> String {
        let items: Vec<String> = SortType::ALL
            .into_iter()
            .map(|sort| {
                if sort == self.current {
                    format!("[{sort}]")
                } else {
                    sort.to_string()
                }
            })
            .collect();
        format!("sort: {}", items.join(" "))
    }

    fn element(&self) -> Option<NodeId> {
        self.element
    }

    fn set_element(&mut self, element: Option<NodeId>) {
        self.element = element;
    }
}
