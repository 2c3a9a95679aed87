//! Transport Seam
//!
//! The backend is reached through [`ReorderTransport`] so the commit flow
//! can run against the browser's fetch or against a test double.

use std::cell::RefCell;

use async_trait::async_trait;

use crate::error::{ApplyError, EditorResult};
use crate::request::{DeleteRequest, ReorderRequest};
use crate::row::Rank;
use crate::session::ReorderSession;

#[async_trait(?Send)]
pub trait ReorderTransport {
    /// `PUT` the new order of a chain
    async fn put_order(&self, request: &ReorderRequest) -> Result<(), ApplyError>;

    /// `DELETE` one task
    async fn delete_task(&self, request: &DeleteRequest) -> Result<(), ApplyError>;
}

/// Commit the session's current order.
///
/// The session is only borrowed around the await point, so drag events
/// keep being processed while the request is pending. Returns the rank
/// renumbering applied on success.
pub async fn commit<T>(
    session: &RefCell<ReorderSession>,
    transport: &T,
) -> EditorResult<Vec<(Rank, Rank)>>
where
    T: ReorderTransport + ?Sized,
{
    let request = session.borrow_mut().begin_apply()?;
    let result = transport.put_order(&request).await;
    session.borrow_mut().finish_apply(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    use futures::executor::block_on;

    use crate::error::EditorError;
    use crate::order::Placement;
    use crate::row::Row;
    use crate::session::EditorState;

    struct MockTransport {
        status: u16,
        body: &'static str,
        sent: RefCell<Vec<ReorderRequest>>,
    }

    impl MockTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self { status, body, sent: RefCell::new(Vec::new()) }
        }
    }

    #[async_trait(?Send)]
    impl ReorderTransport for MockTransport {
        async fn put_order(&self, request: &ReorderRequest) -> Result<(), ApplyError> {
            self.sent.borrow_mut().push(request.clone());
            if (200..300).contains(&self.status) {
                Ok(())
            } else {
                Err(ApplyError::rejected(self.status, self.body))
            }
        }

        async fn delete_task(&self, _request: &DeleteRequest) -> Result<(), ApplyError> {
            Ok(())
        }
    }

    /// Tries to commit again while the first request is pending
    struct ReentrantTransport<'a> {
        session: &'a RefCell<ReorderSession>,
        nested: Cell<Option<EditorError>>,
    }

    #[async_trait(?Send)]
    impl ReorderTransport for ReentrantTransport<'_> {
        async fn put_order(&self, _request: &ReorderRequest) -> Result<(), ApplyError> {
            let nested = self.session.borrow_mut().begin_apply().err();
            self.nested.set(nested);
            Ok(())
        }

        async fn delete_task(&self, _request: &DeleteRequest) -> Result<(), ApplyError> {
            Ok(())
        }
    }

    fn dirty_session() -> RefCell<ReorderSession> {
        let rows = (0..4).map(|r| Row::new("3", "post", r)).collect();
        let mut session = ReorderSession::new(rows, None).unwrap();
        session.begin_drag(3).unwrap();
        session.drag_over(0, Placement::Before).unwrap();
        session.drop_on(0);
        RefCell::new(session)
    }

    #[test]
    fn test_commit_success() {
        let session = dirty_session();
        let transport = MockTransport::new(200, "");

        let remap = block_on(commit(&session, &transport)).unwrap();
        assert_eq!(remap.len(), 4);
        assert_eq!(
            transport.sent.borrow().as_slice(),
            &[ReorderRequest { rule_id: 3, chain: "post".into(), ranks: vec![3, 0, 1, 2] }]
        );

        let s = session.borrow();
        assert_eq!(s.state(), EditorState::Idle);
        assert!(!s.controls_visible());
    }

    #[test]
    fn test_commit_server_error() {
        let session = dirty_session();
        let transport = MockTransport::new(500, "database is locked");

        let err = block_on(commit(&session, &transport)).unwrap_err();
        match err {
            EditorError::Apply(apply) => {
                assert_eq!(apply.user_message("reorder tasks"), "database is locked")
            }
            other => panic!("unexpected error {other:?}"),
        }

        let s = session.borrow();
        assert_eq!(s.state(), EditorState::Dirty);
        assert!(s.controls_visible());
        assert_eq!(s.order(), &[3, 0, 1, 2]);
    }

    #[test]
    fn test_overlapping_commit_is_rejected() {
        let session = dirty_session();
        let transport = ReentrantTransport { session: &session, nested: Cell::new(None) };

        block_on(commit(&session, &transport)).unwrap();
        assert_eq!(transport.nested.take(), Some(EditorError::ApplyInFlight));
        assert!(!session.borrow().is_in_flight());
    }
}
