//! Handle types.

use crate::raw::Handle;

/// Kernel objects that [`wait_synchronization_single`](crate::sync::wait_synchronization_single)
/// and [`close_handle`](crate::sync::close_handle) accept.
pub trait Waitable: _priv::Sealed {
    /// Returns the raw handle of the object.
    fn raw_handle(&self) -> Handle;
}

/// Defines a typed, [`Waitable`] newtype over a raw [`Handle`].
///
/// Values are only built inside the defining module, from handles the kernel returned, or through
/// `invalid()` as a placeholder for "no object".
///
/// [`Handle`]: crate::raw::Handle
macro_rules! define_waitable_handle_type {
    {
        $(#[$meta:meta])* $vis:vis struct $name:ident
    } => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[repr(transparent)]
        $vis struct $name($crate::raw::Handle);

        impl $name {
            /// Returns a handle that refers to no object.
            pub const fn invalid() -> Self {
                Self($crate::raw::INVALID_HANDLE)
            }

            /// Returns `true` unless this is the [`invalid`](Self::invalid) handle.
            pub fn is_valid(&self) -> bool {
                self.0 != $crate::raw::INVALID_HANDLE
            }
        }

        impl $crate::handle::Waitable for $name {
            #[inline]
            fn raw_handle(&self) -> $crate::raw::Handle {
                self.0
            }
        }

        impl $crate::handle::_priv::Sealed for $name {}
    };
}

pub(crate) mod _priv {
    /// Keeps [`Waitable`](super::Waitable) implementations inside this crate.
    pub trait Sealed {}
}
