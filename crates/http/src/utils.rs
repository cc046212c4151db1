//! Internal helper macros shared by the codec and protocol modules.

/// Returns early with `Err($error)` when `$predicate` does not hold.
///
/// Used for limit and format checks where failing the check is an ordinary
/// outcome of decoding untrusted bytes rather than a bug.
///
/// ```ignore
/// ensure!(len <= budget, DecodeError::too_long_frame(LineKind::Header, max));
/// ```
macro_rules! ensure {
    ($predicate:expr, $error:expr) => {
        if !$predicate {
            return Err($error);
        }
    };
}

pub(crate) use ensure;
