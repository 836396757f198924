// Downbar state managers
// The panel manager owns the display list and active-set reconciliation.

pub mod panel_manager;
