use kernel::KernelError;

/// Maps backend-specific failures onto the kernel error contexts. Each
/// backend module provides the impls for its own error types.
pub trait ConvertError {
    type Ok;
    fn convert_error(self) -> error_stack::Result<Self::Ok, KernelError>;
}
