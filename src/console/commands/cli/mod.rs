pub mod add;
pub mod delete;
pub mod edit;
pub mod list;

use crate::cli::error::CliError;
use std::future::Future;

/// The commands are synchronous; each one drives its requests on a
/// single-threaded runtime.
pub(crate) fn block_on<F, T>(future: F) -> Result<T, CliError>
where
    F: Future<Output = Result<T, CliError>>,
{
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(future)
}
