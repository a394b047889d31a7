use super::{invalid, present, Resolver};
use crate::error::AppError;
use crate::models::{
    NewProject, Project, ProjectInput, ProjectListing, ProjectPatch, ProjectView, RecordId,
};
use crate::store::Store;

/// Project lifecycle. Only the owner may change or remove a project.
pub struct Projects<'a> {
    store: &'a dyn Store,
}

fn parse_project_id(raw: &str) -> Result<RecordId, AppError> {
    RecordId::parse(raw).ok_or_else(|| invalid("Invalid project ID"))
}

fn project_not_found() -> AppError {
    AppError::NotFound("Project not found".into())
}

impl<'a> Projects<'a> {
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    pub async fn create(&self, input: ProjectInput, owner: &RecordId) -> Result<Project, AppError> {
        let (Some(project_name), Some(des)) = (present(&input.project_name), present(&input.des))
        else {
            return Err(invalid("Project name and description are required"));
        };

        let project = self
            .store
            .insert_project(NewProject {
                project_name: project_name.to_string(),
                des: des.to_string(),
                created_by: owner.clone(),
            })
            .await?;
        log::info!("user {} created project {}", owner, project.id);
        Ok(project)
    }

    /// Applies a partial update to a project the caller owns.
    ///
    /// A project owned by someone else is reported as missing.
    pub async fn update(
        &self,
        raw_id: &str,
        owner: &RecordId,
        input: ProjectInput,
    ) -> Result<Project, AppError> {
        let id = parse_project_id(raw_id)?;
        self.owned(&id, owner).await?;

        let patch = ProjectPatch {
            project_name: present(&input.project_name).map(str::to_string),
            des: present(&input.des).map(str::to_string),
        };
        if patch.is_empty() {
            return Err(invalid(
                "At least one field (project name or description) is required to update",
            ));
        }

        self.store
            .update_project(&id, patch)
            .await?
            .ok_or_else(project_not_found)
    }

    pub async fn get(&self, raw_id: &str) -> Result<ProjectView, AppError> {
        let id = parse_project_id(raw_id)?;
        self.store
            .find_project(&id)
            .await?
            .map(ProjectView::from)
            .ok_or_else(project_not_found)
    }

    pub async fn list_by_owner(&self, owner: &RecordId) -> Result<Vec<ProjectView>, AppError> {
        let projects = self.store.list_projects_by_owner(owner).await?;
        Ok(projects.into_iter().map(ProjectView::from).collect())
    }

    /// Every project with its owner resolved. An empty catalogue is a 404.
    pub async fn list_all(&self) -> Result<Vec<ProjectListing>, AppError> {
        let projects = self.store.list_projects().await?;
        if projects.is_empty() {
            return Err(AppError::NotFound("No projects found".into()));
        }

        let mut resolver = Resolver::new(self.store);
        let mut listings = Vec::with_capacity(projects.len());
        for project in projects {
            let created_by = resolver.user(&project.created_by).await?;
            listings.push(ProjectListing {
                id: project.id,
                project_name: project.project_name,
                des: project.des,
                created_by,
                created_at: project.created_at,
            });
        }
        Ok(listings)
    }

    /// Removes a project the caller owns. Its tasks are left in place.
    pub async fn delete(&self, raw_id: &str, owner: &RecordId) -> Result<(), AppError> {
        let id = parse_project_id(raw_id)?;
        self.owned(&id, owner).await?;

        if !self.store.delete_project(&id).await? {
            return Err(project_not_found());
        }
        log::info!("user {} deleted project {}", owner, id);
        Ok(())
    }

    async fn owned(&self, id: &RecordId, owner: &RecordId) -> Result<Project, AppError> {
        match self.store.find_project(id).await? {
            Some(project) if &project.created_by == owner => Ok(project),
            Some(_) => {
                log::info!("user {} denied access to project {}", owner, id);
                Err(project_not_found())
            }
            None => Err(project_not_found()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewUser, Role};
    use crate::store::MemoryStore;
    use pretty_assertions::assert_eq;

    fn input(name: &str, des: &str) -> ProjectInput {
        ProjectInput {
            project_name: Some(name.to_string()),
            des: Some(des.to_string()),
        }
    }

    async fn user(store: &MemoryStore, email: &str) -> RecordId {
        store
            .insert_user(NewUser {
                email: email.to_string(),
                password_hash: "hash".to_string(),
                name: "Someone".to_string(),
                role: Role::Member,
            })
            .await
            .unwrap()
            .id
    }

    #[actix_rt::test]
    async fn test_create_requires_both_fields() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let projects = Projects::new(&store);

        let err = projects.create(input("Alpha", ""), &owner).await.unwrap_err();
        assert_eq!(
            err,
            AppError::ValidationError("Project name and description are required".into())
        );

        projects.create(input("Alpha", "first"), &owner).await.unwrap();
        let err = projects
            .create(input("Alpha", "again"), &owner)
            .await
            .unwrap_err();
        assert_eq!(err, AppError::ValidationError("Project name already exists".into()));
    }

    #[actix_rt::test]
    async fn test_foreign_project_looks_missing() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let other = user(&store, "other@example.com").await;
        let projects = Projects::new(&store);
        let project = projects.create(input("Alpha", "first"), &owner).await.unwrap();

        let err = projects
            .update(project.id.as_str(), &other, input("Beta", "changed"))
            .await
            .unwrap_err();
        assert_eq!(err, project_not_found());
        let err = projects
            .delete(project.id.as_str(), &other)
            .await
            .unwrap_err();
        assert_eq!(err, project_not_found());

        let unchanged = projects.get(project.id.as_str()).await.unwrap();
        assert_eq!(unchanged.project_name, "Alpha");
    }

    #[actix_rt::test]
    async fn test_update_needs_a_field_and_keeps_the_other() {
        let store = MemoryStore::new();
        let owner = user(&store, "owner@example.com").await;
        let projects = Projects::new(&store);
        let project = projects.create(input("Alpha", "first"), &owner).await.unwrap();

        let err = projects
            .update(project.id.as_str(), &owner, ProjectInput::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let updated = projects
            .update(
                project.id.as_str(),
                &owner,
                ProjectInput {
                    project_name: None,
                    des: Some("second".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.project_name, "Alpha");
        assert_eq!(updated.des, "second");
    }

    #[actix_rt::test]
    async fn test_list_all_resolves_owners_and_rejects_empty() {
        let store = MemoryStore::new();
        let projects = Projects::new(&store);
        assert_eq!(
            projects.list_all().await.unwrap_err(),
            AppError::NotFound("No projects found".into())
        );

        let owner = user(&store, "owner@example.com").await;
        projects.create(input("Alpha", "first"), &owner).await.unwrap();
        projects.create(input("Beta", "second"), &owner).await.unwrap();

        let listings = projects.list_all().await.unwrap();
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].project_name, "Alpha");
        let created_by = listings[1].created_by.as_ref().unwrap();
        assert_eq!(created_by.email, "owner@example.com");
    }

    #[actix_rt::test]
    async fn test_malformed_id_is_rejected_before_lookup() {
        let store = MemoryStore::new();
        let projects = Projects::new(&store);
        assert_eq!(
            projects.get("not-an-id").await.unwrap_err(),
            AppError::ValidationError("Invalid project ID".into())
        );
    }
}
