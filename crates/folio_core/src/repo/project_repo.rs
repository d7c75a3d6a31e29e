//! Project repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/get/list/delete over the `projects` table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewProject::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Deleting an absent id is `NotFound`, including a repeated delete.

use crate::db::DbError;
use crate::model::project::{NewProject, Project, ProjectId, Slug, ValidationError};
use log::debug;
use rusqlite::{params, Connection, Row};
use thiserror::Error;

const PROJECT_SELECT_SQL: &str = "SELECT
    id,
    header,
    subtitle,
    description,
    link,
    folder_name
FROM projects";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for project persistence and query operations.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("project not found: {0}")]
    NotFound(ProjectId),
    #[error("invalid persisted project data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Listing order for `list_all`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ListOrder {
    /// Descending by id; the gallery order.
    #[default]
    NewestFirst,
    /// Ascending by id.
    OldestFirst,
}

impl ListOrder {
    fn as_sql(self) -> &'static str {
        match self {
            Self::NewestFirst => "ORDER BY id DESC",
            Self::OldestFirst => "ORDER BY id ASC",
        }
    }
}

/// Repository interface for project metadata.
pub trait ProjectRepository {
    /// Inserts one project and returns its newly assigned id.
    fn create(&self, project: &NewProject) -> RepoResult<ProjectId>;
    /// Returns all projects in the requested order. No pagination.
    fn list_all(&self, order: ListOrder) -> RepoResult<Vec<Project>>;
    fn get(&self, id: ProjectId) -> RepoResult<Project>;
    fn delete(&self, id: ProjectId) -> RepoResult<()>;
    /// Distinct media folders referenced by any row, sorted by name.
    fn list_folders(&self) -> RepoResult<Vec<Slug>>;
    /// Whether any row references `folder`. Does not parse other rows.
    fn folder_in_use(&self, folder: &Slug) -> RepoResult<bool>;
}

/// SQLite-backed project repository.
pub struct SqliteProjectRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProjectRepository<'conn> {
    /// Wraps a migrated connection (see `db::open_db`).
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl ProjectRepository for SqliteProjectRepository<'_> {
    fn create(&self, project: &NewProject) -> RepoResult<ProjectId> {
        project.validate()?;

        self.conn.execute(
            "INSERT INTO projects (
                header,
                subtitle,
                description,
                link,
                folder_name
            ) VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                project.title.as_str(),
                project.subtitle.as_deref(),
                project.description.as_deref(),
                project.link.as_deref(),
                project.folder.as_ref().map(Slug::as_str),
            ],
        )?;

        let raw_id = self.conn.last_insert_rowid();
        let id = ProjectId::new(raw_id).ok_or_else(|| {
            RepoError::InvalidData(format!("store assigned non-positive id `{raw_id}`"))
        })?;
        debug!("event=project_insert module=repo status=ok project_id={id}");
        Ok(id)
    }

    fn list_all(&self, order: ListOrder) -> RepoResult<Vec<Project>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} {};", order.as_sql()))?;
        let mut rows = stmt.query([])?;
        let mut projects = Vec::new();

        while let Some(row) = rows.next()? {
            projects.push(parse_project_row(row)?);
        }

        Ok(projects)
    }

    fn get(&self, id: ProjectId) -> RepoResult<Project> {
        let mut stmt = self
            .conn
            .prepare(&format!("{PROJECT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query(params![id.get()])?;
        match rows.next()? {
            Some(row) => parse_project_row(row),
            None => Err(RepoError::NotFound(id)),
        }
    }

    fn delete(&self, id: ProjectId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM projects WHERE id = ?1;", params![id.get()])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn list_folders(&self) -> RepoResult<Vec<Slug>> {
        let mut stmt = self.conn.prepare(
            "SELECT DISTINCT folder_name
             FROM projects
             WHERE folder_name IS NOT NULL AND folder_name <> ''
             ORDER BY folder_name ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut folders = Vec::new();

        while let Some(row) = rows.next()? {
            let value: String = row.get(0)?;
            folders.push(parse_folder(&value)?);
        }

        Ok(folders)
    }

    fn folder_in_use(&self, folder: &Slug) -> RepoResult<bool> {
        let in_use: bool = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM projects WHERE folder_name = ?1);",
            params![folder.as_str()],
            |row| row.get(0),
        )?;
        Ok(in_use)
    }
}

fn parse_project_row(row: &Row<'_>) -> RepoResult<Project> {
    let raw_id: i64 = row.get("id")?;
    let id = ProjectId::new(raw_id).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid id value `{raw_id}` in projects.id"))
    })?;

    let title = row
        .get::<_, Option<String>>("header")?
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| {
            RepoError::InvalidData(format!("empty title in projects.header for id {id}"))
        })?;

    // Older rows may carry an empty folder name instead of NULL.
    let folder = match row.get::<_, Option<String>>("folder_name")? {
        Some(value) if !value.is_empty() => Some(parse_folder(&value)?),
        _ => None,
    };

    Ok(Project {
        id,
        title,
        subtitle: row.get("subtitle")?,
        description: row.get("description")?,
        link: row.get("link")?,
        folder,
    })
}

fn parse_folder(value: &str) -> RepoResult<Slug> {
    Slug::parse(value).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "folder `{value}` in projects.folder_name is not a relative folder name"
        ))
    })
}
