pub use gossamer_graph::GraphError as Error;
pub use gossamer_graph::Result;
