//! Deterministic demo dataset: a small vitamin catalog, the matching
//! rule set, and one completed demo survey. Used by the CLI `seed`
//! command and by server tests.

use rust_decimal::Decimal;
use serde_json::json;

use vitarec_core::domain::product::{Product, ProductId};
use vitarec_core::domain::rule::{RuleCondition, RuleId, VitaminRule};
use vitarec_core::domain::survey::{
    ActivityLevel, AgeGroup, Gender, Nutrition, StressLevel, SurveyProfile, UserId,
};
use vitarec_core::chrono::Utc;

use crate::repositories::{
    ProductCatalogRepository, RepositoryError, SqlProductCatalog, SqlSurveyRepository,
    SqlVitaminRuleRepository, SurveyRepository, VitaminRuleRepository,
};
use crate::DbPool;

pub const DEMO_USER_ID: &str = "user-demo-001";

struct ProductSeed {
    id: &'static str,
    sku: &'static str,
    name: &'static str,
    description: &'static str,
    price_cents: i64,
    restrictions: &'static [&'static str],
    target_complaints: &'static [&'static str],
    target_goals: &'static [&'static str],
    vitamin_type: &'static [&'static str],
    benefits: &'static [&'static str],
    dosage: &'static str,
}

const PRODUCT_SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "prod-magnesium-b6",
        sku: "VIT-MG-001",
        name: "Магний B6",
        description: "Магний с витамином B6 для нервной системы",
        price_cents: 89_900,
        restrictions: &[],
        target_complaints: &["stress", "sleep_problems"],
        target_goals: &["stress_relief", "better_sleep"],
        vitamin_type: &["magnesium"],
        benefits: &["снижение тревожности", "спокойный сон"],
        dosage: "2 таблетки в день",
    },
    ProductSeed {
        id: "prod-vitamin-d3",
        sku: "VIT-D3-001",
        name: "Витамин D3 2000 МЕ",
        description: "Холекальциферол в масляных капсулах",
        price_cents: 64_900,
        restrictions: &[],
        target_complaints: &["low_immunity", "fatigue"],
        target_goals: &["immunity"],
        vitamin_type: &["vitamin_d"],
        benefits: &["поддержка иммунитета", "здоровье костей"],
        dosage: "1 капсула в день",
    },
    ProductSeed {
        id: "prod-omega-3",
        sku: "VIT-OM-001",
        name: "Омега-3 Premium",
        description: "Концентрат рыбьего жира высокой очистки",
        price_cents: 119_900,
        restrictions: &[],
        target_complaints: &["memory_issues"],
        target_goals: &["heart_health", "memory"],
        vitamin_type: &["omega_3"],
        benefits: &["здоровье сердца", "поддержка памяти"],
        dosage: "2 капсулы в день",
    },
    ProductSeed {
        id: "prod-b-complex",
        sku: "VIT-BC-001",
        name: "B-комплекс Актив",
        description: "Восемь витаминов группы B",
        price_cents: 74_900,
        restrictions: &[],
        target_complaints: &["fatigue", "stress"],
        target_goals: &["energy"],
        vitamin_type: &["b_complex"],
        benefits: &["энергия", "работа нервной системы"],
        dosage: "1 таблетка в день",
    },
    ProductSeed {
        id: "prod-iron",
        sku: "VIT-FE-001",
        name: "Железо Хелат",
        description: "Бисглицинат железа мягкого действия",
        price_cents: 84_900,
        restrictions: &[],
        target_complaints: &["fatigue"],
        target_goals: &["energy"],
        vitamin_type: &["iron"],
        benefits: &["уровень гемоглобина"],
        dosage: "1 капсула в день",
    },
    ProductSeed {
        id: "prod-multivitamin",
        sku: "VIT-MV-001",
        name: "Мультивитамин Дейли",
        description: "Витаминно-минеральный комплекс в драже",
        price_cents: 99_900,
        restrictions: &["diabetic"],
        target_complaints: &[],
        target_goals: &["general_wellness", "immunity"],
        vitamin_type: &["multivitamin"],
        benefits: &["базовая поддержка организма"],
        dosage: "1 драже в день",
    },
    ProductSeed {
        id: "prod-zinc",
        sku: "VIT-ZN-001",
        name: "Цинк Пиколинат",
        description: "Цинк в хорошо усваиваемой форме",
        price_cents: 54_900,
        restrictions: &[],
        target_complaints: &["skin_issues", "low_immunity"],
        target_goals: &["skin_health", "immunity"],
        vitamin_type: &["zinc"],
        benefits: &["здоровье кожи"],
        dosage: "1 таблетка в день",
    },
    ProductSeed {
        id: "prod-probiotic",
        sku: "VIT-PB-001",
        name: "Пробиотик Баланс",
        description: "Комплекс лакто- и бифидобактерий",
        price_cents: 129_900,
        restrictions: &["lactose_free"],
        target_complaints: &["digestive_issues"],
        target_goals: &["general_wellness"],
        vitamin_type: &["probiotics"],
        benefits: &["микрофлора кишечника"],
        dosage: "1 капсула в день",
    },
];

struct RuleSeed {
    id: &'static str,
    name: &'static str,
    priority: i64,
    condition: fn() -> serde_json::Value,
    vitamins: &'static [&'static str],
}

const RULE_SEEDS: &[RuleSeed] = &[
    RuleSeed {
        id: "rule-high-stress",
        name: "Высокий уровень стресса",
        priority: 1,
        condition: || json!({"stress_level": ["high", "constant"]}),
        vitamins: &["magnesium", "b_complex"],
    },
    RuleSeed {
        id: "rule-low-activity",
        name: "Низкая физическая активность",
        priority: 2,
        condition: || json!({"activity_level": ["none"]}),
        vitamins: &["vitamin_d"],
    },
    RuleSeed {
        id: "rule-fatigue",
        name: "Жалобы на усталость",
        priority: 2,
        condition: || json!({"complaints": ["fatigue"]}),
        vitamins: &["b_complex", "iron"],
    },
    RuleSeed {
        id: "rule-poor-nutrition",
        name: "Нерегулярное питание",
        priority: 3,
        condition: || json!({"nutrition": ["rare"]}),
        vitamins: &["multivitamin"],
    },
    RuleSeed {
        id: "rule-women-reproductive",
        name: "Женщины репродуктивного возраста",
        priority: 4,
        condition: || json!({"gender": "female", "age_group": ["18_30", "31_45"]}),
        vitamins: &["iron"],
    },
    RuleSeed {
        id: "rule-digestive",
        name: "Проблемы с пищеварением",
        priority: 5,
        condition: || json!({"complaints": ["digestive_issues"]}),
        vitamins: &["probiotics"],
    },
];

fn owned(tags: &[&str]) -> Vec<String> {
    tags.iter().map(|tag| (*tag).to_owned()).collect()
}

fn build_products() -> Vec<Product> {
    PRODUCT_SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId(seed.id.to_owned()),
            sku: seed.sku.to_owned(),
            name: seed.name.to_owned(),
            description: Some(seed.description.to_owned()),
            price: Decimal::new(seed.price_cents, 2),
            restrictions: owned(seed.restrictions),
            target_complaints: owned(seed.target_complaints),
            target_goals: owned(seed.target_goals),
            vitamin_type: owned(seed.vitamin_type),
            benefits: owned(seed.benefits),
            dosage: Some(seed.dosage.to_owned()),
            active: true,
        })
        .collect()
}

fn build_rules() -> Result<Vec<VitaminRule>, RepositoryError> {
    RULE_SEEDS
        .iter()
        .map(|seed| {
            let condition = RuleCondition::from_json(&(seed.condition)()).map_err(|error| {
                RepositoryError::Decode(format!("seed rule `{}`: {error}", seed.id))
            })?;
            Ok(VitaminRule {
                id: RuleId(seed.id.to_owned()),
                name: seed.name.to_owned(),
                condition,
                vitamins: owned(seed.vitamins),
                priority: seed.priority,
                active: true,
            })
        })
        .collect()
}

fn build_demo_profile() -> SurveyProfile {
    SurveyProfile {
        user_id: UserId(DEMO_USER_ID.to_owned()),
        age_group: AgeGroup::From18To30,
        gender: Gender::Female,
        activity_level: ActivityLevel::None,
        stress_level: StressLevel::High,
        nutrition: Nutrition::Rare,
        restrictions: vec!["diabetic".to_owned()],
        complaints: vec!["fatigue".to_owned(), "stress".to_owned()],
        goals: vec!["energy".to_owned(), "stress_relief".to_owned()],
        vitamins_current: vec!["omega_3".to_owned()],
        completed: true,
        completed_at: Some(Utc::now()),
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SeedResult {
    pub products: usize,
    pub rules: usize,
    pub profiles: usize,
}

#[derive(Clone, Debug)]
pub struct SeedCheck {
    pub name: &'static str,
    pub passed: bool,
}

#[derive(Clone, Debug)]
pub struct VerificationResult {
    pub checks: Vec<SeedCheck>,
}

impl VerificationResult {
    pub fn passed(&self) -> bool {
        self.checks.iter().all(|check| check.passed)
    }
}

pub struct DemoSeedDataset;

impl DemoSeedDataset {
    /// Load (or refresh) the demo dataset. Saves are upserts, so the
    /// seed is safe to run repeatedly.
    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let catalog = SqlProductCatalog::new(pool.clone());
        let rules = SqlVitaminRuleRepository::new(pool.clone());
        let surveys = SqlSurveyRepository::new(pool.clone());

        let products = build_products();
        for product in &products {
            catalog.save(product.clone()).await?;
        }

        let rule_set = build_rules()?;
        for rule in &rule_set {
            rules.save(rule.clone()).await?;
        }

        let profile = build_demo_profile();
        surveys.save(profile).await?;

        Ok(SeedResult { products: products.len(), rules: rule_set.len(), profiles: 1 })
    }

    /// Verify the seed against its contract: row counts plus the demo
    /// profile's presence.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        let product_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM products WHERE is_active = 1")
                .fetch_one(pool)
                .await?;
        checks.push(SeedCheck {
            name: "products",
            passed: product_count == PRODUCT_SEEDS.len() as i64,
        });

        let rule_count: i64 =
            sqlx::query_scalar("SELECT COUNT(1) FROM vitamin_rules WHERE is_active = 1")
                .fetch_one(pool)
                .await?;
        checks.push(SeedCheck { name: "rules", passed: rule_count == RULE_SEEDS.len() as i64 });

        let demo_exists: i64 = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM survey_profiles WHERE user_id = ? AND survey_completed = 1)",
        )
        .bind(DEMO_USER_ID)
        .fetch_one(pool)
        .await?;
        checks.push(SeedCheck { name: "demo-profile", passed: demo_exists == 1 });

        Ok(VerificationResult { checks })
    }
}
