/// Curated menu of one day, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilteredMenu {
    /// `"{category}: {description}"` for every relevant main dish.
    pub dishes: Vec<String>,
    pub sides: Vec<String>,
}
