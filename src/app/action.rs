/// Everything that can change application state. Each action is dispatched
/// to the store and then applied to the view state.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Navigate(String),
    Back,
    Forward,
    OpenAddressBar,
    CloseAddressBar,
    AddressChanged(String),
    DraftChanged(String),
    DraftSubmitted,
    ToggleEntries,
    Quit,
}
