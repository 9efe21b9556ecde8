use serde::Serialize;

use vitarec_core::config::{AppConfig, LoadOptions};
use vitarec_db::connect_with_settings;

#[derive(Debug, Serialize)]
struct DoctorCheck {
    name: &'static str,
    status: &'static str,
    detail: String,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    status: &'static str,
    checks: Vec<DoctorCheck>,
}

pub fn run(json: bool) -> String {
    let mut checks = Vec::new();

    let config = match AppConfig::load(LoadOptions::default()) {
        Ok(config) => {
            checks.push(DoctorCheck {
                name: "config",
                status: "ok",
                detail: format!(
                    "database `{}`, max {} recommendations",
                    config.database.url, config.recommendation.max_recommendations
                ),
            });
            Some(config)
        }
        Err(error) => {
            checks.push(DoctorCheck {
                name: "config",
                status: "error",
                detail: error.to_string(),
            });
            None
        }
    };

    if let Some(config) = &config {
        checks.push(database_check(config));
    }

    let healthy = checks.iter().all(|check| check.status == "ok");
    let report =
        DoctorReport { status: if healthy { "ok" } else { "error" }, checks };

    if json {
        serde_json::to_string_pretty(&report).unwrap_or_else(|error| {
            format!("{{\"status\":\"error\",\"detail\":\"serialization: {error}\"}}")
        })
    } else {
        render_text(&report)
    }
}

fn database_check(config: &AppConfig) -> DoctorCheck {
    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            return DoctorCheck {
                name: "database",
                status: "error",
                detail: format!("failed to initialize async runtime: {error}"),
            };
        }
    };

    runtime.block_on(async {
        match connect_with_settings(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
        {
            Ok(pool) => {
                let check = match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(&pool).await {
                    Ok(_) => DoctorCheck {
                        name: "database",
                        status: "ok",
                        detail: "connectivity check succeeded".to_string(),
                    },
                    Err(error) => DoctorCheck {
                        name: "database",
                        status: "error",
                        detail: format!("query failed: {error}"),
                    },
                };
                pool.close().await;
                check
            }
            Err(error) => DoctorCheck {
                name: "database",
                status: "error",
                detail: format!("connection failed: {error}"),
            },
        }
    })
}

fn render_text(report: &DoctorReport) -> String {
    let mut lines = vec![format!("doctor: {}", report.status)];
    for check in &report.checks {
        lines.push(format!("  [{}] {} - {}", check.status, check.name, check.detail));
    }
    lines.join("\n")
}
