use std::time::Instant;

use anyhow::Context;
use campus_core::hash_password;
use campus_models::roles::STUDENT_ROLE;
use fake::Fake;
use fake::faker::name::en::{FirstName, LastName};
use rayon::prelude::*;
use sqlx::{PgPool, QueryBuilder};
use uuid::Uuid;

use super::SEED_EMAIL_DOMAIN;
use super::models::StudentSeed;

// 6 binds per row, well under the Postgres limit of 65535.
const BATCH_SIZE: usize = 1000;

fn slug(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Builds `count` fake students sharing one password hash. `run` keeps
/// usernames and emails unique across seeding runs.
pub fn generate_students(count: usize, run: &str, password_hash: &str) -> Vec<StudentSeed> {
    (0..count)
        .into_par_iter()
        .map(|idx| {
            let first_name: String = FirstName().fake();
            let last_name: String = LastName().fake();
            let username = format!("{}.{}.{run}{idx}", slug(&first_name), slug(&last_name));
            let email = format!("{username}@{SEED_EMAIL_DOMAIN}");
            let mobile = format!("9{:09}", (0..1_000_000_000u64).fake::<u64>());

            StudentSeed {
                first_name,
                last_name,
                username,
                email,
                mobile,
                password_hash: password_hash.to_string(),
            }
        })
        .collect()
}

/// Inserts `count` fake students with the STUDENT role when it exists.
/// The password is hashed once for the whole batch.
pub async fn seed_students(db: &PgPool, count: usize, password: &str) -> anyhow::Result<usize> {
    let start_time = Instant::now();
    println!("🎓 Seeding {count} students...");

    let password_hash = hash_password(password)?;
    let run = Uuid::new_v4().simple().to_string()[..6].to_string();
    let students = generate_students(count, &run, &password_hash);

    let role_id: Option<Uuid> = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1")
        .bind(STUDENT_ROLE)
        .fetch_optional(db)
        .await?;
    if role_id.is_none() {
        println!("   ⚠ Role {STUDENT_ROLE} not found, students will have no role");
    }

    let mut tx = db.begin().await?;
    let mut inserted = 0;

    for chunk in students.chunks(BATCH_SIZE) {
        let mut query = QueryBuilder::new(
            "INSERT INTO students (first_name, last_name, username, email, password_hash, mobile, role_id) ",
        );
        query.push_values(chunk, |mut row, student| {
            row.push_bind(&student.first_name)
                .push_bind(&student.last_name)
                .push_bind(&student.username)
                .push_bind(&student.email)
                .push_bind(&student.password_hash)
                .push_bind(&student.mobile)
                .push_bind(role_id);
        });

        let result = query
            .build()
            .execute(&mut *tx)
            .await
            .context("Failed to insert students")?;
        inserted += result.rows_affected() as usize;
    }

    tx.commit().await?;

    println!(
        "   ✓ Inserted {inserted} students in {:?}",
        start_time.elapsed()
    );
    Ok(inserted)
}

/// Removes generated students. Roles and the super admin are kept.
pub async fn clear_seed(db: &PgPool) -> anyhow::Result<u64> {
    let result = sqlx::query("DELETE FROM students WHERE email LIKE '%@' || $1")
        .bind(SEED_EMAIL_DOMAIN)
        .execute(db)
        .await
        .context("Failed to clear seeded students")?;
    Ok(result.rows_affected())
}
