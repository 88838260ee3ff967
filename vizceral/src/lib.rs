pub mod handlers;
pub mod server;

// Re-export commonly used handler functions for convenience
pub use handlers::{duplicate_policy, load_edges_from_file, render_graph, write_output};
pub use server::{AppState, create_router, fetch_graph};
