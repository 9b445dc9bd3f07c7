//! PostgreSQL implementation of BallotStore.
//!
//! Agendas, sessions and votes live in three tables. The agenda row carries
//! the aggregate version; every write bumps it inside the same transaction
//! that checks its precondition.
//!
//! A vote append first locks the owning agenda row, so it serializes with
//! agenda replaces, then inserts the vote only if the session is open and the
//! vote falls inside its window. The `(session_id, cpf)` primary key makes
//! the one-vote-per-cpf rule hold even if two appends reach the insert.
//!
//! Closing a session or an agenda takes the same agenda row lock and flips
//! status columns only, without comparing versions, so a close never loses to
//! a vote that committed first. Closed is terminal, so the aggregate read back
//! after commit shows the closed state.

use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::domain::ballot::{Agenda, Session, Vote, VoteType};
use crate::domain::foundation::{
    AgendaId, AgendaStatus, Cpf, SessionId, SessionStatus, Timestamp, UserId,
};
use crate::ports::{
    AgendaPage, BallotStore, ClosedAgenda, ListOptions, StoreError, VersionedAgenda,
};

/// PostgreSQL implementation of the BallotStore port.
pub struct PostgresBallotStore {
    pool: PgPool,
}

impl PostgresBallotStore {
    /// Creates a new PostgresBallotStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an agenda.
#[derive(Debug, sqlx::FromRow)]
struct AgendaRow {
    id: Uuid,
    title: String,
    description: String,
    created_by: String,
    created_at: DateTime<Utc>,
    status: String,
    version: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    agenda_id: Uuid,
    start_time: DateTime<Utc>,
    end_time: DateTime<Utc>,
    status: String,
}

#[derive(Debug, sqlx::FromRow)]
struct VoteRow {
    session_id: Uuid,
    cpf: String,
    user_id: String,
    vote_type: String,
    cast_at: DateTime<Utc>,
}

impl TryFrom<VoteRow> for Vote {
    type Error = StoreError;

    fn try_from(row: VoteRow) -> Result<Self, Self::Error> {
        let cpf = Cpf::parse(row.cpf.trim()).map_err(corrupt)?;
        let user_id = UserId::new(row.user_id).map_err(corrupt)?;
        let vote_type = VoteType::from_str(&row.vote_type).map_err(corrupt)?;
        Ok(Vote::new(
            user_id,
            cpf,
            vote_type,
            Timestamp::from_datetime(row.cast_at),
        ))
    }
}

fn corrupt(e: impl std::fmt::Display) -> StoreError {
    StoreError::Database(format!("Invalid stored value: {}", e))
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> StoreError + '_ {
    move |e| StoreError::Database(format!("{}: {}", context, e))
}

fn to_db_version(version: u64) -> Result<i64, StoreError> {
    i64::try_from(version).map_err(|_| StoreError::Database(format!("Version out of range: {}", version)))
}

fn from_db_version(version: i64) -> Result<u64, StoreError> {
    u64::try_from(version).map_err(|_| StoreError::Database(format!("Negative version: {}", version)))
}

impl PostgresBallotStore {
    /// Loads sessions and votes for the given agenda rows and assembles the
    /// aggregates, preserving the row order.
    async fn assemble(&self, rows: Vec<AgendaRow>) -> Result<Vec<VersionedAgenda>, StoreError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let agenda_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let session_rows: Vec<SessionRow> = sqlx::query_as(
            r#"
            SELECT id, agenda_id, start_time, end_time, status
            FROM voting_sessions
            WHERE agenda_id = ANY($1)
            ORDER BY agenda_id, position
            "#,
        )
        .bind(&agenda_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load sessions"))?;

        let vote_rows: Vec<VoteRow> = sqlx::query_as(
            r#"
            SELECT v.session_id, v.cpf, v.user_id, v.vote_type, v.cast_at
            FROM votes v
            JOIN voting_sessions s ON s.id = v.session_id
            WHERE s.agenda_id = ANY($1)
            ORDER BY v.session_id, v.seq
            "#,
        )
        .bind(&agenda_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load votes"))?;

        let mut votes_by_session: HashMap<Uuid, Vec<Vote>> = HashMap::new();
        for row in vote_rows {
            let session_id = row.session_id;
            votes_by_session
                .entry(session_id)
                .or_default()
                .push(Vote::try_from(row)?);
        }

        let mut sessions_by_agenda: HashMap<Uuid, Vec<Session>> = HashMap::new();
        for row in session_rows {
            let status = SessionStatus::from_str(&row.status).map_err(corrupt)?;
            let votes = votes_by_session.remove(&row.id).unwrap_or_default();
            sessions_by_agenda
                .entry(row.agenda_id)
                .or_default()
                .push(Session::reconstitute(
                    SessionId::from_uuid(row.id),
                    AgendaId::from_uuid(row.agenda_id),
                    Timestamp::from_datetime(row.start_time),
                    Timestamp::from_datetime(row.end_time),
                    status,
                    votes,
                ));
        }

        rows.into_iter()
            .map(|row| -> Result<VersionedAgenda, StoreError> {
                let status = AgendaStatus::from_str(&row.status).map_err(corrupt)?;
                let created_by = UserId::new(row.created_by).map_err(corrupt)?;
                let sessions = sessions_by_agenda.remove(&row.id).unwrap_or_default();
                Ok(VersionedAgenda {
                    agenda: Agenda::reconstitute(
                        AgendaId::from_uuid(row.id),
                        row.title,
                        row.description,
                        created_by,
                        Timestamp::from_datetime(row.created_at),
                        status,
                        sessions,
                    ),
                    version: from_db_version(row.version)?,
                })
            })
            .collect()
    }

    async fn upsert_sessions(
        tx: &mut Transaction<'_, Postgres>,
        agenda: &Agenda,
    ) -> Result<(), StoreError> {
        for (position, session) in agenda.sessions().iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO voting_sessions (id, agenda_id, position, start_time, end_time, status)
                VALUES ($1, $2, $3, $4, $5, $6)
                ON CONFLICT (id) DO UPDATE SET status = EXCLUDED.status
                "#,
            )
            .bind(session.id().as_uuid())
            .bind(agenda.id().as_uuid())
            .bind(position as i32)
            .bind(session.start_time().as_datetime())
            .bind(session.end_time().as_datetime())
            .bind(session.status().as_str())
            .execute(&mut **tx)
            .await
            .map_err(db_error("Failed to save session"))?;
        }
        Ok(())
    }
}

#[async_trait]
impl BallotStore for PostgresBallotStore {
    async fn insert_agenda(&self, agenda: &Agenda) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO agendas (id, title, description, created_by, created_at, status, version)
            VALUES ($1, $2, $3, $4, $5, $6, 1)
            "#,
        )
        .bind(agenda.id().as_uuid())
        .bind(agenda.title())
        .bind(agenda.description())
        .bind(agenda.created_by().as_str())
        .bind(agenda.created_at().as_datetime())
        .bind(agenda.status().as_str())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("agendas_pkey") {
                    return StoreError::AlreadyExists(*agenda.id());
                }
            }
            StoreError::Database(format!("Failed to save agenda: {}", e))
        })?;

        Self::upsert_sessions(&mut tx, agenda).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn find_agenda(&self, id: &AgendaId) -> Result<Option<VersionedAgenda>, StoreError> {
        let row: Option<AgendaRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, created_by, created_at, status, version
            FROM agendas
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find agenda"))?;

        let Some(row) = row else {
            return Ok(None);
        };
        Ok(self.assemble(vec![row]).await?.into_iter().next())
    }

    async fn find_agenda_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<VersionedAgenda>, StoreError> {
        let agenda_id: Option<Uuid> =
            sqlx::query_scalar("SELECT agenda_id FROM voting_sessions WHERE id = $1")
                .bind(session_id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("Failed to find session"))?;

        match agenda_id {
            Some(id) => self.find_agenda(&AgendaId::from_uuid(id)).await,
            None => Ok(None),
        }
    }

    async fn list_agendas(&self, options: &ListOptions) -> Result<AgendaPage, StoreError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM agendas")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count agendas"))?;

        let rows: Vec<AgendaRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, created_by, created_at, status, version
            FROM agendas
            ORDER BY created_at ASC, id ASC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(options.effective_limit()))
        .bind(i64::from(options.effective_offset()))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list agendas"))?;

        let items = self
            .assemble(rows)
            .await?
            .into_iter()
            .map(|v| v.agenda)
            .collect();
        Ok(AgendaPage::new(items, total.max(0) as u64, options))
    }

    async fn find_agendas_with_open_sessions(&self) -> Result<Vec<Agenda>, StoreError> {
        let rows: Vec<AgendaRow> = sqlx::query_as(
            r#"
            SELECT a.id, a.title, a.description, a.created_by, a.created_at, a.status, a.version
            FROM agendas a
            WHERE EXISTS (
                SELECT 1 FROM voting_sessions s
                WHERE s.agenda_id = a.id AND s.status = 'open'
            )
            ORDER BY a.created_at ASC, a.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list agendas with open sessions"))?;

        Ok(self
            .assemble(rows)
            .await?
            .into_iter()
            .map(|v| v.agenda)
            .collect())
    }

    async fn replace_agenda(
        &self,
        agenda: &Agenda,
        expected_version: u64,
    ) -> Result<u64, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let new_version: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE agendas SET
                title = $3,
                description = $4,
                status = $5,
                version = version + 1
            WHERE id = $1 AND version = $2
            RETURNING version
            "#,
        )
        .bind(agenda.id().as_uuid())
        .bind(to_db_version(expected_version)?)
        .bind(agenda.title())
        .bind(agenda.description())
        .bind(agenda.status().as_str())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to update agenda"))?;

        let Some(new_version) = new_version else {
            let exists: bool =
                sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM agendas WHERE id = $1)")
                    .bind(agenda.id().as_uuid())
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(db_error("Failed to check agenda"))?;
            tx.rollback()
                .await
                .map_err(db_error("Failed to rollback transaction"))?;
            return Err(if exists {
                StoreError::Conflict(*agenda.id())
            } else {
                StoreError::AgendaNotFound(*agenda.id())
            });
        };

        Self::upsert_sessions(&mut tx, agenda).await?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;
        from_db_version(new_version)
    }

    async fn append_vote(&self, session_id: &SessionId, vote: &Vote) -> Result<(), StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        // Serializes with replace_agenda on the same aggregate.
        let agenda_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT a.id
            FROM agendas a
            JOIN voting_sessions s ON s.agenda_id = a.id
            WHERE s.id = $1
            FOR UPDATE OF a
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock agenda"))?;

        let Some(agenda_id) = agenda_id else {
            tx.rollback()
                .await
                .map_err(db_error("Failed to rollback transaction"))?;
            return Err(StoreError::SessionNotFound(*session_id));
        };

        let inserted = sqlx::query(
            r#"
            INSERT INTO votes (session_id, cpf, user_id, vote_type, cast_at)
            SELECT s.id, $2, $3, $4, $5
            FROM voting_sessions s
            WHERE s.id = $1
              AND s.status = 'open'
              AND s.start_time <= $5
              AND s.end_time > $5
            ON CONFLICT (session_id, cpf) DO NOTHING
            "#,
        )
        .bind(session_id.as_uuid())
        .bind(vote.cpf().as_str())
        .bind(vote.user_id().as_str())
        .bind(vote.vote_type().as_str())
        .bind(vote.cast_at().as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to insert vote"))?
        .rows_affected();

        if inserted == 0 {
            let duplicate: bool = sqlx::query_scalar(
                "SELECT EXISTS (SELECT 1 FROM votes WHERE session_id = $1 AND cpf = $2)",
            )
            .bind(session_id.as_uuid())
            .bind(vote.cpf().as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(db_error("Failed to check vote"))?;
            tx.rollback()
                .await
                .map_err(db_error("Failed to rollback transaction"))?;
            return Err(if duplicate {
                StoreError::DuplicateVote(*session_id)
            } else {
                StoreError::PreconditionFailed(format!(
                    "Session {} is not accepting votes at {}",
                    session_id,
                    vote.cast_at()
                ))
            });
        }

        sqlx::query("UPDATE agendas SET version = version + 1 WHERE id = $1")
            .bind(agenda_id)
            .execute(&mut *tx)
            .await
            .map_err(db_error("Failed to bump agenda version"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;
        Ok(())
    }

    async fn close_session(&self, session_id: &SessionId) -> Result<Session, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let agenda_id: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT a.id
            FROM agendas a
            JOIN voting_sessions s ON s.agenda_id = a.id
            WHERE s.id = $1
            FOR UPDATE OF a
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("Failed to lock agenda"))?;

        let Some(agenda_id) = agenda_id else {
            tx.rollback()
                .await
                .map_err(db_error("Failed to rollback transaction"))?;
            return Err(StoreError::SessionNotFound(*session_id));
        };

        let closed = sqlx::query(
            "UPDATE voting_sessions SET status = 'closed' WHERE id = $1 AND status = 'open'",
        )
        .bind(session_id.as_uuid())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to close session"))?
        .rows_affected();

        if closed > 0 {
            sqlx::query("UPDATE agendas SET version = version + 1 WHERE id = $1")
                .bind(agenda_id)
                .execute(&mut *tx)
                .await
                .map_err(db_error("Failed to bump agenda version"))?;
        }

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        self.find_agenda(&AgendaId::from_uuid(agenda_id))
            .await?
            .and_then(|v| v.agenda.session(session_id).cloned())
            .ok_or(StoreError::SessionNotFound(*session_id))
    }

    async fn close_agenda(&self, agenda_id: &AgendaId) -> Result<ClosedAgenda, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("Failed to start transaction"))?;

        let status: Option<String> =
            sqlx::query_scalar("SELECT status FROM agendas WHERE id = $1 FOR UPDATE")
                .bind(agenda_id.as_uuid())
                .fetch_optional(&mut *tx)
                .await
                .map_err(db_error("Failed to lock agenda"))?;

        let rejection = match status.as_deref() {
            None => Some(StoreError::AgendaNotFound(*agenda_id)),
            Some(s) if AgendaStatus::from_str(s).map_err(corrupt)?.is_closed() => {
                Some(StoreError::AgendaClosed(*agenda_id))
            }
            Some(_) => None,
        };
        if let Some(err) = rejection {
            tx.rollback()
                .await
                .map_err(db_error("Failed to rollback transaction"))?;
            return Err(err);
        }

        let closed_ids: Vec<Uuid> = sqlx::query_scalar(
            r#"
            WITH closed AS (
                UPDATE voting_sessions SET status = 'closed'
                WHERE agenda_id = $1 AND status = 'open'
                RETURNING id, position
            )
            SELECT id FROM closed ORDER BY position
            "#,
        )
        .bind(agenda_id.as_uuid())
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("Failed to close sessions"))?;

        sqlx::query(
            "UPDATE agendas SET status = $2, version = version + 1 WHERE id = $1",
        )
        .bind(agenda_id.as_uuid())
        .bind(AgendaStatus::Closed.as_str())
        .execute(&mut *tx)
        .await
        .map_err(db_error("Failed to close agenda"))?;

        tx.commit()
            .await
            .map_err(db_error("Failed to commit transaction"))?;

        let agenda = self
            .find_agenda(agenda_id)
            .await?
            .ok_or(StoreError::AgendaNotFound(*agenda_id))?
            .agenda;
        Ok(ClosedAgenda {
            agenda,
            closed_sessions: closed_ids.into_iter().map(SessionId::from_uuid).collect(),
        })
    }
}
