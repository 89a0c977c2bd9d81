use tollgate_domain::directory::{DirectoryFilter, DirectoryUser};
use tollgate_domain::pagination::{Page, PaginationCursor};

use crate::domain::repository::DirectoryPort;
use crate::domain::types::DIRECTORY_PAGE_LIMIT;
use crate::error::LifecycleError;

/// Paginated search over the directory for one filter.
///
/// Pages are fetched strictly one at a time; the directory's cursor is only
/// defined for sequential consumption. A failed page aborts the scan and
/// whatever was seen before it is discarded.
pub struct DirectoryScanner<D: DirectoryPort> {
    directory: D,
    filter: DirectoryFilter,
}

impl<D: DirectoryPort> DirectoryScanner<D> {
    pub fn new(directory: D, filter: DirectoryFilter) -> Self {
        Self { directory, filter }
    }

    /// Fetch a single page of at most `DIRECTORY_PAGE_LIMIT` users starting at `cursor`.
    pub async fn page(
        &self,
        cursor: Option<&PaginationCursor>,
    ) -> Result<Page<DirectoryUser>, LifecycleError> {
        let page = self
            .directory
            .search(&self.filter, DIRECTORY_PAGE_LIMIT, cursor)
            .await?;
        tracing::debug!(
            filter = %self.filter,
            users = page.items.len(),
            has_next = page.next.is_some(),
            "directory page fetched"
        );
        Ok(page)
    }

    /// Walk pages until `matches` accepts a user, or the directory is exhausted.
    pub async fn find_first<F>(&self, mut matches: F) -> Result<Option<DirectoryUser>, LifecycleError>
    where
        F: FnMut(&DirectoryUser) -> bool,
    {
        let mut cursor: Option<PaginationCursor> = None;
        loop {
            let page = self.page(cursor.as_ref()).await?;
            if let Some(found) = page.items.into_iter().find(|user| matches(user)) {
                return Ok(Some(found));
            }
            match page.next {
                None => return Ok(None),
                Some(next) if cursor.as_ref() == Some(&next) => {
                    return Err(anyhow::anyhow!(
                        "directory returned the same cursor twice for {}",
                        self.filter
                    )
                    .into());
                }
                Some(next) => cursor = Some(next),
            }
        }
    }
}
