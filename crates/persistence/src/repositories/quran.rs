//! Repositories for the static Quran reference tables.

use domain::models::{HizbIndexEntry, QuranAyah, VerseKey};
use sqlx::PgPool;

use crate::entities::{HizbIndexEntity, QuranAyahEntity};
use crate::metrics::QueryTimer;

/// Repository for the hizb_index table.
#[derive(Clone)]
pub struct HizbIndexRepository {
    pool: PgPool,
}

impl HizbIndexRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Replace the whole index with `rows` in one transaction.
    ///
    /// Returns the number of rows written.
    pub async fn replace_all(&self, rows: &[HizbIndexEntry]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("replace_hizb_index");
        let mut tx = self.pool.begin().await?;

        let cleared = sqlx::query("DELETE FROM hizb_index")
            .execute(&mut *tx)
            .await?
            .rows_affected();
        tracing::debug!(cleared, "Cleared hizb_index");

        let hizbs: Vec<i32> = rows.iter().map(|r| r.hizb).collect();
        let start_surahs: Vec<i32> = rows.iter().map(|r| r.start_surah).collect();
        let start_ayahs: Vec<i32> = rows.iter().map(|r| r.start_ayah).collect();
        let end_surahs: Vec<i32> = rows.iter().map(|r| r.end_surah).collect();
        let end_ayahs: Vec<i32> = rows.iter().map(|r| r.end_ayah).collect();

        let written = sqlx::query(
            r#"
            INSERT INTO hizb_index (hizb, start_surah, start_ayah, end_surah, end_ayah)
            SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::int4[], $4::int4[], $5::int4[])
            ON CONFLICT (hizb) DO UPDATE SET
                start_surah = EXCLUDED.start_surah,
                start_ayah = EXCLUDED.start_ayah,
                end_surah = EXCLUDED.end_surah,
                end_ayah = EXCLUDED.end_ayah
            "#,
        )
        .bind(&hizbs)
        .bind(&start_surahs)
        .bind(&start_ayahs)
        .bind(&end_surahs)
        .bind(&end_ayahs)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;
        timer.record();
        Ok(written)
    }

    /// Fetch index rows for `start..=end`, ordered by hizb.
    pub async fn find_range(&self, start: i32, end: i32) -> Result<Vec<HizbIndexEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_hizb_index_range");
        let result = sqlx::query_as::<_, HizbIndexEntity>(
            r#"
            SELECT hizb, start_surah, start_ayah, end_surah, end_ayah
            FROM hizb_index
            WHERE hizb BETWEEN $1 AND $2
            ORDER BY hizb ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

/// Repository for the quran_ayahs table.
#[derive(Clone)]
pub struct QuranAyahRepository {
    pool: PgPool,
}

impl QuranAyahRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert or update a batch of verses keyed by `(surah, ayah)`.
    pub async fn upsert_batch(&self, rows: &[QuranAyah]) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("upsert_quran_ayahs");
        let surahs: Vec<i32> = rows.iter().map(|r| r.surah).collect();
        let ayahs: Vec<i32> = rows.iter().map(|r| r.ayah).collect();
        let texts: Vec<&str> = rows.iter().map(|r| r.text_ar.as_str()).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO quran_ayahs (surah, ayah, text_ar)
            SELECT * FROM UNNEST($1::int4[], $2::int4[], $3::text[])
            ON CONFLICT (surah, ayah) DO UPDATE SET text_ar = EXCLUDED.text_ar
            "#,
        )
        .bind(&surahs)
        .bind(&ayahs)
        .bind(&texts)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Fetch the verses from `from` to `to` inclusive, in reading order.
    pub async fn find_between(
        &self,
        from: VerseKey,
        to: VerseKey,
    ) -> Result<Vec<QuranAyahEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_quran_ayahs_between");
        let result = sqlx::query_as::<_, QuranAyahEntity>(
            r#"
            SELECT surah, ayah, text_ar
            FROM quran_ayahs
            WHERE (surah, ayah) >= ($1, $2) AND (surah, ayah) <= ($3, $4)
            ORDER BY surah ASC, ayah ASC
            "#,
        )
        .bind(from.surah)
        .bind(from.ayah)
        .bind(to.surah)
        .bind(to.ayah)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
