//! Result codes returned by the kernel object calls.
//!
//! A raw result code is `0` on success. Failures pack the producing module and a description
//! into a single `u32`:
//!
//! - **Bits 0-8:** Module ID
//! - **Bits 9-21:** Description
//! - **Bits 22-31:** Reserved

use crate::error::{IntoDescription, Module};

/// Type alias for Result with [`Error`] as the error type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// The raw representation of a result code, containing both success and error states.
///
/// For error handling with the standard library traits, see [`Result`] and [`Error`].
pub type ResultCode = u32;

/// The successful raw result code.
pub const SUCCESS: ResultCode = 0;

/// A failed kernel call.
///
/// The error code is formatted as `2XXX-YYYY` where:
///  - `XXX` is `2000` + module number
///  - `YYYY` is the `description`
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Error(raw::ResultCode);

impl Error {
    /// Builds an error from a module and description.
    pub fn from_parts(module: Module, description: impl IntoDescription) -> Self {
        Self(raw::ResultCode::from_parts(module, description))
    }

    /// Returns the module that caused the error
    #[inline]
    pub const fn module(&self) -> Module {
        self.0.module()
    }

    /// Returns the description value
    #[inline]
    pub const fn description(&self) -> u32 {
        self.0.description()
    }

    /// Returns the raw value (`u32`) of this error code
    #[inline]
    pub const fn to_raw(self) -> ResultCode {
        self.0.to_raw()
    }
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{:04}-{:04}",
            2000 + self.0.module_number(),
            self.0.description()
        )
    }
}

impl core::fmt::Debug for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Error")
            .field("code", &format_args!("{}", self))
            .field("module", &self.0.module())
            .field("description", &self.0.description())
            .field("raw", &format_args!("{:#x}", self.0.to_raw()))
            .finish()
    }
}

impl core::error::Error for Error {}

impl From<raw::ResultCode> for Error {
    fn from(value: raw::ResultCode) -> Self {
        Self(value)
    }
}

/// Raw representation of the result code
pub(crate) mod raw {
    use super::SUCCESS;
    use crate::error::{IntoDescription, Module};

    /// Mask for the module field (9 bits)
    const MODULE_MASK: u32 = 0x1FF;
    /// Mask for the description field (13 bits)
    const DESCRIPTION_MASK: u32 = 0x1FFF;
    /// Shift amount for the description field
    const DESCRIPTION_SHIFT: u32 = 9;

    /// A result code split into its constituent fields.
    #[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
    #[repr(transparent)]
    pub struct ResultCode(u32);

    impl ResultCode {
        #[inline]
        pub const fn from_raw(value: u32) -> Self {
            Self(value)
        }

        #[inline]
        pub const fn to_raw(self) -> u32 {
            self.0
        }

        #[inline]
        pub fn from_parts(module: Module, description: impl IntoDescription) -> Self {
            let description = description.into_value();

            let module_val = (module as u32) & MODULE_MASK;
            let desc_val = (description & DESCRIPTION_MASK) << DESCRIPTION_SHIFT;
            Self(module_val | desc_val)
        }

        #[inline]
        pub const fn module_number(&self) -> u32 {
            self.0 & MODULE_MASK
        }

        #[inline]
        pub const fn module(&self) -> Module {
            Module::from_raw(self.module_number())
        }

        #[inline]
        pub const fn description(&self) -> u32 {
            (self.0 >> DESCRIPTION_SHIFT) & DESCRIPTION_MASK
        }
    }

    /// Outcome of a raw kernel call.
    pub enum Result {
        Success,
        Error(ResultCode),
    }

    impl Result {
        /// Creates a new [`Result`] from a raw result code `u32` value
        pub fn from_raw(raw: u32) -> Self {
            if raw == SUCCESS {
                Result::Success
            } else {
                Result::Error(ResultCode(raw))
            }
        }

        /// Converts this [`Result`] into a [`core::result::Result`] with custom success and error
        /// values.
        #[inline]
        pub fn map<T, E>(
            self,
            ok: T,
            err: impl FnOnce(ResultCode) -> E,
        ) -> core::result::Result<T, E> {
            match self {
                Result::Success => Ok(ok),
                Result::Error(rc) => Err(err(rc)),
            }
        }

        /// Like [`map`](Self::map) with a unit success type.
        #[inline]
        pub fn map_err<E>(self, err: impl FnOnce(ResultCode) -> E) -> core::result::Result<(), E> {
            self.map((), err)
        }
    }
}
