/// Layout actions reachable from the keyboard surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PaneCommand {
    SplitRight,
    SplitDown,
    ClosePane,
    FocusPrev,
    FocusNext,
}
