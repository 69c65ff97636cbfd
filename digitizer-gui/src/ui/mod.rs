pub mod dashboard_page;
pub mod flowgraph_view;
pub mod header;
pub mod open_dashboard_page;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    View,
    Flowgraph,
    File,
}
