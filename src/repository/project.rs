use std::collections::HashMap;

use chrono::Utc;
use diesel::prelude::*;

use crate::domain::project::{
    Media, NewMedia, NewProject, Project, ProjectChanges, attach_media,
};
use crate::domain::types::{MediaId, ProjectId, ProjectTitle, Sequence};
use crate::models::project::{
    NewProject as DbNewProject, Project as DbProject, ProjectMedia as DbProjectMedia,
    encode_technologies,
};
use crate::ordering::SequenceUpdate;
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, ProjectListQuery, ProjectReader, ProjectWriter};

impl ProjectReader for DieselRepository {
    fn list_projects(&self, query: ProjectListQuery) -> RepositoryResult<Vec<Project>> {
        use crate::schema::{project_media, projects};

        let mut conn = self.conn()?;

        let mut items = projects::table.into_boxed::<diesel::sqlite::Sqlite>();
        if let Some(category_id) = &query.category_id {
            items = items.filter(projects::category_id.eq(category_id.as_str()));
        }

        // SQLite sorts NULL lowest, so projects without a sequence come last.
        let rows = items
            .order((
                projects::display_order.desc(),
                projects::created_at.desc(),
            ))
            .load::<DbProject>(&mut conn)?;

        let ids: Vec<&str> = rows.iter().map(|p| p.id.as_str()).collect();
        let mut media_by_project: HashMap<String, Vec<DbProjectMedia>> = HashMap::new();
        for media in project_media::table
            .filter(project_media::project_id.eq_any(ids))
            .load::<DbProjectMedia>(&mut conn)?
        {
            media_by_project
                .entry(media.project_id.clone())
                .or_default()
                .push(media);
        }

        let projects = rows
            .into_iter()
            .map(|row| {
                let media = media_by_project.remove(&row.id).unwrap_or_default();
                row.into_domain(media)
            })
            .collect::<Result<Vec<Project>, _>>()?;

        Ok(projects)
    }

    fn get_project_by_id(&self, id: &ProjectId) -> RepositoryResult<Option<Project>> {
        use crate::schema::{project_media, projects};

        let mut conn = self.conn()?;

        let Some(row) = projects::table
            .filter(projects::id.eq(id.as_str()))
            .first::<DbProject>(&mut conn)
            .optional()?
        else {
            return Ok(None);
        };

        let media = project_media::table
            .filter(project_media::project_id.eq(id.as_str()))
            .load::<DbProjectMedia>(&mut conn)?;

        Ok(Some(row.into_domain(media)?))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(
        &self,
        project: &NewProject,
        sequence: Sequence,
    ) -> RepositoryResult<Project> {
        use crate::schema::{project_media, projects};

        let mut conn = self.conn()?;
        let project = project.clone().into_project(ProjectId::generate(), sequence);

        conn.transaction(|conn| {
            diesel::insert_into(projects::table)
                .values(DbNewProject::from(&project))
                .execute(conn)?;

            let media: Vec<DbProjectMedia> = project.media.iter().map(Into::into).collect();
            if !media.is_empty() {
                diesel::insert_into(project_media::table)
                    .values(&media)
                    .execute(conn)?;
            }
            Ok::<_, RepositoryError>(())
        })?;

        Ok(project)
    }

    fn update_project(
        &self,
        id: &ProjectId,
        changes: &ProjectChanges,
    ) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.as_str())))
            .set((
                projects::title.eq(changes.title.as_str()),
                projects::description.eq(&changes.description),
                projects::category_id.eq(changes.category_id.as_ref().map(|c| c.as_str())),
                projects::technologies.eq(encode_technologies(&changes.technologies)),
                projects::updated_at.eq(changes.updated_at),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn rename_project(&self, id: &ProjectId, title: &ProjectTitle) -> RepositoryResult<usize> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let affected = diesel::update(projects::table.filter(projects::id.eq(id.as_str())))
            .set((
                projects::title.eq(title.as_str()),
                projects::updated_at.eq(Utc::now().naive_utc()),
            ))
            .execute(&mut conn)?;

        Ok(affected)
    }

    fn set_project_sequences(
        &self,
        updates: &[SequenceUpdate<ProjectId>],
    ) -> RepositoryResult<()> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            for update in updates {
                let affected =
                    diesel::update(projects::table.filter(projects::id.eq(update.id.as_str())))
                        .set(projects::display_order.eq(Some(update.to.get())))
                        .execute(conn)?;
                if affected == 0 {
                    return Err(RepositoryError::NotFound);
                }
            }
            Ok(())
        })
    }

    fn add_project_media(
        &self,
        project_id: &ProjectId,
        media: &[NewMedia],
    ) -> RepositoryResult<Vec<Media>> {
        use crate::schema::{project_media, projects};

        let mut conn = self.conn()?;

        conn.transaction(|conn| {
            let exists = projects::table
                .filter(projects::id.eq(project_id.as_str()))
                .count()
                .get_result::<i64>(conn)?
                > 0;
            if !exists {
                return Err(RepositoryError::NotFound);
            }

            let last: Option<i32> = project_media::table
                .filter(project_media::project_id.eq(project_id.as_str()))
                .select(diesel::dsl::max(project_media::display_order))
                .first(conn)?;
            let first = last.map_or(Sequence::new(0), |s| Sequence::new(s).next());

            let attached = attach_media(project_id, media.to_vec(), first);
            let rows: Vec<DbProjectMedia> = attached.iter().map(Into::into).collect();
            if !rows.is_empty() {
                diesel::insert_into(project_media::table)
                    .values(&rows)
                    .execute(conn)?;
            }
            Ok(attached)
        })
    }

    fn delete_project_media(
        &self,
        project_id: &ProjectId,
        media_id: &MediaId,
    ) -> RepositoryResult<usize> {
        use crate::schema::project_media;

        let mut conn = self.conn()?;

        let affected = diesel::delete(
            project_media::table
                .filter(project_media::id.eq(media_id.as_str()))
                .filter(project_media::project_id.eq(project_id.as_str())),
        )
        .execute(&mut conn)?;

        Ok(affected)
    }

    fn delete_project(&self, id: &ProjectId) -> RepositoryResult<usize> {
        use crate::schema::{project_media, projects};

        let mut conn = self.conn()?;

        // Media first: rows reference the project.
        let affected = conn.transaction(|conn| {
            diesel::delete(project_media::table.filter(project_media::project_id.eq(id.as_str())))
                .execute(conn)?;
            diesel::delete(projects::table.filter(projects::id.eq(id.as_str()))).execute(conn)
        })?;

        Ok(affected)
    }
}
