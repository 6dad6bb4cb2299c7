// Seed two cohorts of students plus one demo user per role.
//
// Usage: cargo run --bin seed-teams
// Reads the same configuration as the server; safe to run repeatedly.

use capstone_teams::config::Settings;
use capstone_teams::core::UserBlueprint;
use capstone_teams::models::{Cohort, CreateCohortRequest, CreateUserRequest, ProfileFields, Role};
use capstone_teams::services::{PostgresClient, PostgresError};
use chrono::NaiveDate;

const STUDENTS_PER_COHORT: usize = 10;

struct CohortSeed {
    name: &'static str,
    start: (i32, u32, u32),
    end: (i32, u32, u32),
    code_prefix: &'static str,
    email_prefix: &'static str,
    first_name: &'static str,
}

const COHORTS: &[CohortSeed] = &[
    CohortSeed {
        name: "Cohort A",
        start: (2024, 1, 1),
        end: (2024, 6, 1),
        code_prefix: "SA",
        email_prefix: "student_a",
        first_name: "StudentA",
    },
    CohortSeed {
        name: "Cohort B",
        start: (2024, 7, 1),
        end: (2024, 12, 1),
        code_prefix: "SB",
        email_prefix: "student_b",
        first_name: "StudentB",
    },
];

const DEMO_USERS: &[(&str, Role, &str, &str)] = &[
    ("student@example.com", Role::Student, "Test", "Student"),
    ("professor@example.com", Role::Professor, "Test", "Professor"),
    ("admin@example.com", Role::Admin, "Test", "Admin"),
];

fn date((y, m, d): (i32, u32, u32)) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

async fn ensure_cohort(db: &PostgresClient, seed: &CohortSeed) -> Result<Cohort, PostgresError> {
    if let Some(existing) = db.find_cohort_by_name(seed.name).await? {
        return Ok(existing);
    }

    db.create_cohort(&CreateCohortRequest {
        name: seed.name.to_string(),
        start_date: date(seed.start),
        end_date: date(seed.end),
        is_active: true,
    })
    .await
}

async fn ensure_user(db: &PostgresClient, req: CreateUserRequest) -> Result<(), PostgresError> {
    match db.find_user_by_email(&req.email).await? {
        Some(user) => {
            // Existing students are moved back into their seeded cohort
            if let (Some(cohort_id), Some(student)) =
                (req.profile.cohort_id, db.student_for_user(user.id).await?)
            {
                db.assign_cohort(student.id, Some(cohort_id)).await?;
            }
            tracing::info!("User {} already exists", req.email);
        }
        None => {
            db.create_user(&UserBlueprint::from_request(&req)).await?;
            println!("Created {}: {}", req.role, req.email);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt().with_target(false).init();

    let settings = Settings::load()?;
    let db = PostgresClient::from_settings(
        &settings.database.url,
        Some(2),
        Some(1),
        settings.database.acquire_timeout_secs,
        settings.database.idle_timeout_secs,
    )
    .await?;

    println!("Seeding team matching data...");

    for seed in COHORTS {
        let cohort = ensure_cohort(&db, seed).await?;

        for i in 1..=STUDENTS_PER_COHORT {
            ensure_user(
                &db,
                CreateUserRequest {
                    email: format!("{}_{}@example.com", seed.email_prefix, i),
                    username: Some(format!("{}_{}", seed.email_prefix, i)),
                    first_name: seed.first_name.to_string(),
                    last_name: i.to_string(),
                    role: Role::Student,
                    profile: ProfileFields {
                        student_id: Some(format!("{}{:03}", seed.code_prefix, i)),
                        cohort_id: Some(cohort.id),
                        enrollment_date: Some(cohort.start_date),
                        ..ProfileFields::default()
                    },
                },
            )
            .await?;
        }
    }

    for (email, role, first_name, last_name) in DEMO_USERS {
        ensure_user(
            &db,
            CreateUserRequest {
                email: email.to_string(),
                username: Some(format!("{}_user", role)),
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                role: *role,
                profile: ProfileFields::default(),
            },
        )
        .await?;
    }

    println!("Successfully seeded team matching data!");
    Ok(())
}
