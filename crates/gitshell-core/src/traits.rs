//! Trait abstractions for command execution.
//!
//! This module defines the `CommandRunner` trait which abstracts running a
//! request, enabling dependency injection and testability.

use std::path::Path;

use crate::request::ExecRequest;
use crate::result::ExecResult;

/// Trait for anything that can run an [`ExecRequest`].
///
/// This trait abstracts command execution, allowing for:
/// - Composition in higher-level facades (e.g. the git facade)
/// - Mock implementations for testing
/// - Alternative implementations (e.g., recording runners)
///
/// Runners are single-owner scratch state, hence `&mut self`.
pub trait CommandRunner {
    /// Run one request and return its uniform result.
    fn execute(&mut self, request: &ExecRequest) -> ExecResult;

    /// The directory used when a request has no explicit working directory.
    fn working_dir(&self) -> &Path;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &mut R {
    fn execute(&mut self, request: &ExecRequest) -> ExecResult {
        (**self).execute(request)
    }

    fn working_dir(&self) -> &Path {
        (**self).working_dir()
    }
}
