use std::env;

use crate::services::progression::RewardRules;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub frontend_url: String,

    pub classifier_url: String,
    pub classifier_timeout_secs: u64,

    // Reward constants changed several times during the pilot; everything
    // numeric lives here rather than in the rule code.
    pub rewards: RewardRules,
    pub allowed_playtimes: Vec<i32>,

    // Whether ending an already-ended walk overwrites it (and re-awards
    // points) or is rejected. Default: rejected.
    pub allow_walk_reclose: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let base_points = env::var("BASE_REWARD_POINTS")
            .unwrap_or_else(|_| "7".into())
            .parse()
            .expect("BASE_REWARD_POINTS must be a number");

        let allowed_playtimes = env::var("ALLOWED_PLAYTIMES")
            .unwrap_or_else(|_| "5,10,15,20,25,30".into())
            .split(',')
            .map(|v| {
                v.trim()
                    .parse()
                    .expect("ALLOWED_PLAYTIMES must be comma-separated minutes")
            })
            .collect();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()
                .expect("PORT must be a number"),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".into()),

            classifier_url: env::var("CLASSIFIER_URL")
                .unwrap_or_else(|_| "http://localhost:9000/classify".into()),
            classifier_timeout_secs: env::var("CLASSIFIER_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".into())
                .parse()
                .expect("CLASSIFIER_TIMEOUT_SECS must be a number"),

            rewards: RewardRules::with_base(base_points),
            allowed_playtimes,

            allow_walk_reclose: env::var("ALLOW_WALK_RECLOSE")
                .unwrap_or_else(|_| "false".into())
                .parse()
                .unwrap_or(false),
        }
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
