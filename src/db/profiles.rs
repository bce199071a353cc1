use sqlx::Result;

use super::Database;
use crate::models::Profile;

const PROFILE_COLUMNS: &str = "id, full_name, email, avatar_url, theme_preference, updated_at";

impl Database {
    pub async fn load_profiles(&self) -> Result<Vec<Profile>> {
        sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles ORDER BY full_name ASC",
            PROFILE_COLUMNS
        ))
        .fetch_all(self.get_pool())
        .await
    }

    pub async fn get_profile(&self, id: i32) -> Result<Profile> {
        sqlx::query_as::<_, Profile>(&format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS))
            .bind(id)
            .fetch_one(self.get_pool())
            .await
    }

    pub async fn create_profile(&self, profile: &Profile) -> Result<i32> {
        sqlx::query_scalar(
            r#"
            INSERT INTO profiles (full_name, email, avatar_url, theme_preference)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .bind(profile.theme_preference.as_str())
        .fetch_one(self.get_pool())
        .await
    }

    pub async fn update_profile(&self, profile: &Profile) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET full_name = $1, email = $2, avatar_url = $3, theme_preference = $4, updated_at = now()
            WHERE id = $5
            "#,
        )
        .bind(&profile.full_name)
        .bind(&profile.email)
        .bind(&profile.avatar_url)
        .bind(profile.theme_preference.as_str())
        .bind(profile.id)
        .execute(self.get_pool())
        .await?;

        Ok(())
    }

    /// Projects and everything under them go with the profile (FK cascade)
    pub async fn delete_profile(&self, id: i32) -> Result<()> {
        sqlx::query("DELETE FROM profiles WHERE id = $1")
            .bind(id)
            .execute(self.get_pool())
            .await?;

        Ok(())
    }
}
