//! Relationship between the current user and another account, and the
//! transitions the friend endpoints are allowed to make.
//!
//! The rules are pure; repositories resolve the current [`Relationship`] and
//! then apply whatever the transition asks for.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relationship {
    None,
    Friends,
    /// The current user sent a request that is still pending
    Outgoing,
    /// The other user sent a request that is still pending
    Incoming,
    SelfUser,
}

/// What sending a friend request has to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    CreateRequest,
    /// The other side already asked, so sending is an accept
    AcceptIncoming,
    AlreadyPending,
}

/// What cancelling has to remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    WithdrawOutgoing,
    DeclineIncoming,
    Nothing,
}

impl Relationship {
    pub fn send(self) -> Result<SendOutcome, DomainError> {
        match self {
            Self::None => Ok(SendOutcome::CreateRequest),
            Self::Incoming => Ok(SendOutcome::AcceptIncoming),
            Self::Outgoing => Ok(SendOutcome::AlreadyPending),
            Self::Friends => Err(DomainError::AlreadyFriends),
            Self::SelfUser => Err(DomainError::CannotFriendSelf),
        }
    }

    pub fn accept(self) -> Result<(), DomainError> {
        match self {
            Self::Incoming => Ok(()),
            Self::SelfUser => Err(DomainError::CannotFriendSelf),
            Self::None | Self::Friends | Self::Outgoing => Err(DomainError::NoPendingRequest),
        }
    }

    pub fn cancel(self) -> CancelOutcome {
        match self {
            Self::Outgoing => CancelOutcome::WithdrawOutgoing,
            Self::Incoming => CancelOutcome::DeclineIncoming,
            Self::None | Self::Friends | Self::SelfUser => CancelOutcome::Nothing,
        }
    }

    /// Returns whether a friendship has to be deleted
    pub fn remove(self) -> Result<bool, DomainError> {
        match self {
            Self::Friends => Ok(true),
            Self::SelfUser => Err(DomainError::CannotRemoveSelf),
            Self::None | Self::Outgoing | Self::Incoming => Ok(false),
        }
    }
}
