//! Scoped slave selection

use core::ops::{Deref, DerefMut};

use crate::connection::Connection;
use crate::line::{Delay, InputLine, OutputLine};

/// Guard for an asserted slave-select line
///
/// Created by [`Connection::select_slave`]. Transfers are issued through the
/// guard, which dereferences to the connection. Dropping the guard, or calling
/// [`release`](Self::release), deasserts slave-select exactly once.
pub struct SlaveSelection<'a, C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    connection: &'a mut Connection<C, S, O, I, D>,
}

impl<'a, C, S, O, I, D> SlaveSelection<'a, C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    pub(crate) fn new(connection: &'a mut Connection<C, S, O, I, D>) -> Self {
        Self { connection }
    }

    /// Deassert slave-select now instead of at end of scope
    pub fn release(self) {
        drop(self);
    }
}

impl<C, S, O, I, D> Deref for SlaveSelection<'_, C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    type Target = Connection<C, S, O, I, D>;

    fn deref(&self) -> &Self::Target {
        self.connection
    }
}

impl<C, S, O, I, D> DerefMut for SlaveSelection<'_, C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.connection
    }
}

impl<C, S, O, I, D> Drop for SlaveSelection<'_, C, S, O, I, D>
where
    C: OutputLine,
    S: OutputLine,
    O: OutputLine,
    I: InputLine,
    D: Delay,
{
    fn drop(&mut self) {
        self.connection.deselect_slave();
    }
}
