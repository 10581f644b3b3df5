//! Scripted transport for backend client tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use async_trait::async_trait;

use super::error::{ApiError, ApiResult};
use super::http::{RawResponse, RestRequest, Transport};

/// Replays queued responses in order and records every request it saw.
/// An exhausted script answers with a network error.
#[derive(Clone, Default)]
pub(crate) struct ScriptedTransport {
    replies: Rc<RefCell<VecDeque<ApiResult<RawResponse>>>>,
    pub(crate) requests: Rc<RefCell<Vec<RestRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn reply(&self, status: u16, body: &str) -> &Self {
        self.replies.borrow_mut().push_back(Ok(RawResponse { status, body: body.to_owned() }));
        self
    }

    pub(crate) fn fail(&self, error: ApiError) -> &Self {
        self.replies.borrow_mut().push_back(Err(error));
        self
    }

    pub(crate) fn sent(&self) -> Vec<RestRequest> {
        self.requests.borrow().clone()
    }

    pub(crate) fn last(&self) -> Option<RestRequest> {
        self.requests.borrow().last().cloned()
    }
}

#[async_trait(?Send)]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: RestRequest) -> ApiResult<RawResponse> {
        self.requests.borrow_mut().push(request);
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Network("no scripted reply".to_owned())))
    }
}
