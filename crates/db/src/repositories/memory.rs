use std::collections::HashMap;

use tokio::sync::RwLock;

use vitarec_core::domain::product::Product;
use vitarec_core::domain::rule::VitaminRule;
use vitarec_core::domain::survey::{SurveyProfile, UserId};

use super::{ProductCatalogRepository, RepositoryError, SurveyRepository, VitaminRuleRepository};

/// In-memory doubles mirroring the ordering contracts of the SQL
/// repositories, for tests and offline tooling.
#[derive(Default)]
pub struct InMemoryProductCatalog {
    products: RwLock<Vec<Product>>,
}

#[async_trait::async_trait]
impl ProductCatalogRepository for InMemoryProductCatalog {
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = self.products.read().await;
        let mut active: Vec<Product> =
            products.iter().filter(|product| product.active).cloned().collect();
        active.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(active)
    }

    async fn save(&self, product: Product) -> Result<(), RepositoryError> {
        let mut products = self.products.write().await;
        match products.iter_mut().find(|existing| existing.id == product.id) {
            Some(existing) => *existing = product,
            None => products.push(product),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryVitaminRuleRepository {
    rules: RwLock<Vec<VitaminRule>>,
}

#[async_trait::async_trait]
impl VitaminRuleRepository for InMemoryVitaminRuleRepository {
    async fn list_active(&self) -> Result<Vec<VitaminRule>, RepositoryError> {
        let rules = self.rules.read().await;
        let mut active: Vec<VitaminRule> =
            rules.iter().filter(|rule| rule.active).cloned().collect();
        // Insertion order stands in for creation order on ties.
        active.sort_by_key(|rule| rule.priority);
        Ok(active)
    }

    async fn save(&self, rule: VitaminRule) -> Result<(), RepositoryError> {
        let mut rules = self.rules.write().await;
        match rules.iter_mut().find(|existing| existing.id == rule.id) {
            Some(existing) => *existing = rule,
            None => rules.push(rule),
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemorySurveyRepository {
    profiles: RwLock<HashMap<String, SurveyProfile>>,
}

#[async_trait::async_trait]
impl SurveyRepository for InMemorySurveyRepository {
    async fn find_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<SurveyProfile>, RepositoryError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(&user_id.0).cloned())
    }

    async fn save(&self, profile: SurveyProfile) -> Result<(), RepositoryError> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(profile.user_id.0.clone(), profile);
        Ok(())
    }
}
