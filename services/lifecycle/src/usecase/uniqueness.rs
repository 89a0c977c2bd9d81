use tollgate_domain::directory::{ContactAttribute, DirectoryFilter, UserAttributes};

use crate::domain::repository::DirectoryPort;
use crate::error::LifecycleError;
use crate::usecase::scanner::DirectoryScanner;

/// Rejects sign-ups whose email or phone number already belongs to a verified account.
pub struct EnforceContactUniquenessUseCase<D: DirectoryPort> {
    pub directory: D,
}

impl<D: DirectoryPort> EnforceContactUniquenessUseCase<D> {
    /// Check email, then phone number. Missing or empty values are never queried.
    /// The first verified match fails the whole check without looking further.
    pub async fn execute(&self, attributes: &UserAttributes) -> Result<(), LifecycleError> {
        for attribute in ContactAttribute::ALL {
            let Some(value) = attributes.non_empty(attribute.name()) else {
                continue;
            };
            if self.is_in_verified_use(attribute, value).await? {
                tracing::info!(attribute = %attribute, "contact already in verified use");
                return Err(LifecycleError::ContactInUse);
            }
        }
        Ok(())
    }

    async fn is_in_verified_use(
        &self,
        attribute: ContactAttribute,
        value: &str,
    ) -> Result<bool, LifecycleError> {
        let filter = DirectoryFilter::AttributeEquals {
            attribute,
            value: value.to_owned(),
        };
        let found = DirectoryScanner::new(&self.directory, filter)
            .find_first(|user| user.attributes.is_verified(attribute))
            .await
            .map_err(LifecycleError::into_contact_check)?;
        Ok(found.is_some())
    }
}
