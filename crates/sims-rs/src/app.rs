//! # Application Interface
//!
//! This module defines the interface through which the helpers drive an
//! in-process application. It is the only seam between test code and the
//! execution engine, so any engine (or a fake such as
//! [`MockApp`](crate::mock::MockApp)) can be driven by the same helpers.
use crate::{
    abci::{CommitResponse, FinalizeBlockRequest, FinalizeBlockResponse, SimulateResponse},
    error::SimsError,
};

/// Block lifecycle operations of an application.
pub trait App {
    /// Executes a transaction without block context and without persisting
    /// state changes.
    ///
    /// # Errors
    ///
    /// Returns the execution error when the transaction would fail.
    fn simulate(&self, tx_bytes: &[u8]) -> Result<SimulateResponse, SimsError>;

    /// Executes the transactions of a new block, producing one result per
    /// transaction. State changes are kept pending until [`App::commit`].
    ///
    /// # Errors
    ///
    /// Returns an error when the block itself is rejected. Failing
    /// transactions are reported through their results instead.
    fn finalize_block(
        &mut self,
        req: &FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, SimsError>;

    /// Persists the state changes of the last finalized block.
    fn commit(&mut self) -> Result<CommitResponse, SimsError>;
}

impl<A: App + ?Sized> App for Box<A> {
    fn simulate(&self, tx_bytes: &[u8]) -> Result<SimulateResponse, SimsError> {
        (**self).simulate(tx_bytes)
    }

    fn finalize_block(
        &mut self,
        req: &FinalizeBlockRequest,
    ) -> Result<FinalizeBlockResponse, SimsError> {
        (**self).finalize_block(req)
    }

    fn commit(&mut self) -> Result<CommitResponse, SimsError> {
        (**self).commit()
    }
}
