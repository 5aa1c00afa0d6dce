use crate::entities::{anime, prelude::*};
use anyhow::{Context, Result};
use sea_orm::sea_query::{BinOper, Expr, Func};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use tracing::info;

// OFFSET is bound as a signed 64-bit integer on the wire.
const MAX_OFFSET: u64 = i64::MAX as u64;

/// Input for creating a catalog record; `id` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAnime {
    pub title: String,
    pub genre: String,
    pub aired_date: String,
    pub synopsis: String,
    pub studio: String,
    pub episodes: i32,
    pub rating: f64,
    pub image_url: String,
}

pub struct AnimeRepository {
    conn: DatabaseConnection,
}

impl AnimeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn make_active_model(record: NewAnime) -> anime::ActiveModel {
        anime::ActiveModel {
            title: Set(record.title),
            genre: Set(record.genre),
            aired_date: Set(record.aired_date),
            synopsis: Set(record.synopsis),
            studio: Set(record.studio),
            episodes: Set(record.episodes),
            rating: Set(record.rating),
            image_url: Set(record.image_url),
            ..Default::default()
        }
    }

    /// One page of the catalog in id (insertion) order, plus the total row
    /// count of the whole table. `limit <= 0` yields an empty page.
    pub async fn list(&self, skip: u64, limit: i64) -> Result<(Vec<anime::Model>, u64)> {
        let total = Anime::find()
            .count(&self.conn)
            .await
            .context("Failed to count anime")?;

        let limit = match u64::try_from(limit) {
            Ok(n) if n > 0 => n,
            _ => return Ok((Vec::new(), total)),
        };

        let rows = Anime::find()
            .order_by_asc(anime::Column::Id)
            .offset(skip.min(MAX_OFFSET))
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to list anime")?;

        Ok((rows, total))
    }

    /// Case-insensitive substring search over title and/or genre (AND when
    /// both are given), paginated like `list`. The total counts every row
    /// matching the filters, not just the returned page.
    pub async fn search(
        &self,
        title: Option<&str>,
        genre: Option<&str>,
        skip: u64,
        limit: i64,
    ) -> Result<(Vec<anime::Model>, u64)> {
        let mut query = Anime::find().order_by_asc(anime::Column::Id);

        // Both sides fold through SQL lower() so one engine's case rules
        // apply; SQLite only folds ASCII, Postgres folds Unicode.
        if let Some(title) = title {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(anime::Column::Title)))
                    .binary(BinOper::Like, Func::lower(Expr::val(format!("%{title}%")))),
            );
        }

        if let Some(genre) = genre {
            query = query.filter(
                Expr::expr(Func::lower(Expr::col(anime::Column::Genre)))
                    .binary(BinOper::Like, Func::lower(Expr::val(format!("%{genre}%")))),
            );
        }

        let total = query
            .clone()
            .count(&self.conn)
            .await
            .context("Failed to count matching anime")?;

        let limit = match u64::try_from(limit) {
            Ok(n) if n > 0 => n,
            _ => return Ok((Vec::new(), total)),
        };

        let rows = query
            .offset(skip.min(MAX_OFFSET))
            .limit(limit)
            .all(&self.conn)
            .await
            .context("Failed to search anime")?;

        Ok((rows, total))
    }

    pub async fn get(&self, id: i32) -> Result<Option<anime::Model>> {
        Anime::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to fetch anime by id")
    }

    pub async fn count(&self) -> Result<u64> {
        Anime::find()
            .count(&self.conn)
            .await
            .context("Failed to count anime")
    }

    pub async fn insert(&self, record: NewAnime) -> Result<anime::Model> {
        let model = Self::make_active_model(record)
            .insert(&self.conn)
            .await
            .context("Failed to insert anime")?;

        info!("Added anime: {}", model.title);
        Ok(model)
    }

    /// Insert the canonical sample records unless the catalog already holds
    /// data. Returns how many rows were written (0 means "already seeded").
    pub async fn seed_sample(&self) -> Result<u64> {
        let existing = Anime::find()
            .count(&self.conn)
            .await
            .context("Failed to count anime")?;
        if existing > 0 {
            return Ok(0);
        }

        let samples = sample_records();
        let inserted = samples.len() as u64;

        let txn = self.conn.begin().await?;
        Anime::insert_many(samples.into_iter().map(Self::make_active_model))
            .exec(&txn)
            .await?;
        txn.commit().await?;

        info!("Seeded {} sample anime records", inserted);
        Ok(inserted)
    }

    /// Delete every catalog row. API keys are untouched.
    pub async fn clear(&self) -> Result<u64> {
        let result = Anime::delete_many()
            .exec(&self.conn)
            .await
            .context("Failed to clear anime")?;

        info!("Cleared {} anime records", result.rows_affected);
        Ok(result.rows_affected)
    }
}

fn sample_records() -> Vec<NewAnime> {
    vec![
        NewAnime {
            title: "원피스".to_string(),
            genre: "액션, 모험".to_string(),
            aired_date: "1999-10-20T00:00:00+00:00".to_string(),
            synopsis: "해적왕을 꿈꾸는 소년 루피의 모험 이야기".to_string(),
            studio: "토에이 애니메이션".to_string(),
            episodes: 1000,
            rating: 9.5,
            image_url: "https://example.com/onepiece.jpg".to_string(),
        },
        NewAnime {
            title: "나루토".to_string(),
            genre: "액션, 모험".to_string(),
            aired_date: "2002-10-03T00:00:00+00:00".to_string(),
            synopsis: "닌자의 꿈을 향해 달리는 소년의 이야기".to_string(),
            studio: "스튜디오 피에로".to_string(),
            episodes: 720,
            rating: 9.0,
            image_url: "https://example.com/naruto.jpg".to_string(),
        },
        NewAnime {
            title: "귀멸의 칼날".to_string(),
            genre: "액션, 판타지".to_string(),
            aired_date: "2019-04-06T00:00:00+00:00".to_string(),
            synopsis: "가족을 지키기 위한 탄지로의 여정".to_string(),
            studio: "유포테이블".to_string(),
            episodes: 26,
            rating: 9.3,
            image_url: "https://example.com/kimetsu.jpg".to_string(),
        },
    ]
}
