//! Chain Reorder
//!
//! DOM-free model behind the task chain reorder editor: rows, their
//! canonical order, the drag session state machine and the requests
//! sent to the backend when the user commits or deletes.

pub mod config;
pub mod error;
pub mod order;
pub mod request;
pub mod row;
pub mod session;
pub mod transport;

pub use config::EditorConfig;
pub use error::{ApplyError, EditorError, EditorResult};
pub use order::{Placement, RowOrder};
pub use request::{DeleteRequest, ReorderRequest};
pub use row::{Rank, Row};
pub use session::{DropOutcome, EditorState, ReorderSession};
pub use transport::{commit, ReorderTransport};
