//! The client facade.

use crate::config::{ClientConfig, ConfigError};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use vc3_infoclient::{DocumentStore, InfoClient};
use vc3_model::{
    AccessFlavor, AccessMethod, Allocation, Cluster, DocumentEntity, EntityKind, EntityName, Environment, Project,
    Request, Resource, ResourceType, User,
};
use vc3_sync::{SyncConfig, SyncEngine, SyncResult};

/// Client API for VC3 entities.
///
/// `define_*` builds and validates an entity without touching the store.
/// `store_*` checks that every entity it references already exists, then
/// writes it. `list_*` and `get_*` always return freshly decoded values.
///
/// The client keeps no state besides the store handle and its config, so
/// it is cheap to clone and safe to share between tasks.
#[derive(Clone)]
pub struct Vc3Client {
    sync: SyncEngine,
}

impl Vc3Client {
    /// Creates a client over `store` with the default sync settings.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self::with_sync_config(store, SyncConfig::default())
    }

    pub fn with_sync_config(store: Arc<dyn DocumentStore>, config: SyncConfig) -> Self {
        Self {
            sync: SyncEngine::with_config(store, config),
        }
    }

    /// Creates a client talking HTTP to the configured information service.
    pub fn from_config(config: &ClientConfig) -> SyncResult<Self> {
        let store = InfoClient::new(config.store.clone())?;
        debug!(endpoint = %config.store.endpoint, "connecting to information service");
        Ok(Self::with_sync_config(Arc::new(store), config.sync.clone()))
    }

    /// Loads a config file and connects with it.
    pub fn connect(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = ClientConfig::load(path)?;
        let store = InfoClient::new(config.store.clone())?;
        Ok(Self::with_sync_config(Arc::new(store), config.sync))
    }

    pub fn sync(&self) -> &SyncEngine {
        &self.sync
    }

    // ── Users ────────────────────────────────────────────────────

    pub fn define_user(
        &self,
        name: &str,
        first: &str,
        last: &str,
        email: &str,
        institution: &str,
    ) -> SyncResult<User> {
        Ok(User::define(name, first, last, email, institution)?)
    }

    pub async fn store_user(&self, user: &User) -> SyncResult<()> {
        self.sync.create(user).await
    }

    /// Replaces a stored user with `user`.
    pub async fn update_user(&self, user: &User) -> SyncResult<()> {
        self.sync.replace(user).await
    }

    pub async fn list_users(&self) -> SyncResult<Vec<User>> {
        self.sync.list().await
    }

    pub async fn get_user(&self, name: &str) -> SyncResult<User> {
        self.sync.get(name).await
    }

    // ── Projects ─────────────────────────────────────────────────

    pub fn define_project(&self, name: &str, owner: &str, members: &[&str]) -> SyncResult<Project> {
        Ok(Project::define(name, owner, members)?)
    }

    /// Stores a project. Its owner, members and allocations must exist.
    pub async fn store_project(&self, project: &Project) -> SyncResult<()> {
        self.check_project_refs(project).await?;
        self.sync.create(project).await
    }

    pub async fn update_project(&self, project: &Project) -> SyncResult<()> {
        self.check_project_refs(project).await?;
        self.sync.replace(project).await
    }

    pub async fn list_projects(&self) -> SyncResult<Vec<Project>> {
        self.sync.list().await
    }

    pub async fn get_project(&self, name: &str) -> SyncResult<Project> {
        self.sync.get(name).await
    }

    /// Adds a stored user to a stored project's members.
    ///
    /// Fails with `NotFound`, without writing, if either is missing. Adding
    /// an existing member changes nothing. Returns the project as stored.
    pub async fn add_user_to_project(&self, project: &str, user: &str) -> SyncResult<Project> {
        let user = EntityName::parse(user)?;
        self.sync.require(EntityKind::User, [&user]).await?;

        let project = self
            .sync
            .update_with(project, |p: &mut Project| Ok(p.add_member(user.clone())))
            .await?;
        debug!(project = %project.name(), %user, "project membership updated");
        Ok(project)
    }

    /// Assigns a stored allocation to a stored project.
    ///
    /// An allocation belongs to at most one project; assigning it to a second
    /// one is a validation error. The allocation is claimed first, so a
    /// failure never leaves a project listing an allocation that points
    /// elsewhere. Returns the project as stored.
    pub async fn add_allocation_to_project(&self, allocation: &str, project: &str) -> SyncResult<Project> {
        let project_name = EntityName::parse(project)?;
        self.sync.require(EntityKind::Project, [&project_name]).await?;

        let allocation: Allocation = self
            .sync
            .update_with(allocation, |a: &mut Allocation| {
                Ok(a.assign_to_project(project_name.clone())?)
            })
            .await?;
        let allocation_name = allocation.name().clone();

        let project = self
            .sync
            .update_with(project, |p: &mut Project| Ok(p.add_allocation(allocation_name.clone())))
            .await?;
        debug!(project = %project.name(), allocation = %allocation_name, "allocation assigned");
        Ok(project)
    }

    async fn check_project_refs(&self, project: &Project) -> SyncResult<()> {
        let users = std::iter::once(project.owner()).chain(project.members());
        self.sync.require(EntityKind::User, users).await?;
        self.sync
            .require(EntityKind::Allocation, project.allocations())
            .await
    }

    // ── Resources ────────────────────────────────────────────────

    pub fn define_resource(
        &self,
        name: &str,
        owner: &str,
        resource_type: ResourceType,
        access_method: AccessMethod,
        access_flavor: AccessFlavor,
        endpoint: &str,
    ) -> SyncResult<Resource> {
        Ok(Resource::define(
            name,
            owner,
            resource_type,
            access_method,
            access_flavor,
            endpoint,
        )?)
    }

    pub async fn store_resource(&self, resource: &Resource) -> SyncResult<()> {
        self.sync.require(EntityKind::User, [resource.owner()]).await?;
        self.sync.create(resource).await
    }

    pub async fn update_resource(&self, resource: &Resource) -> SyncResult<()> {
        self.sync.require(EntityKind::User, [resource.owner()]).await?;
        self.sync.replace(resource).await
    }

    pub async fn list_resources(&self) -> SyncResult<Vec<Resource>> {
        self.sync.list().await
    }

    pub async fn get_resource(&self, name: &str) -> SyncResult<Resource> {
        self.sync.get(name).await
    }

    // ── Allocations ──────────────────────────────────────────────

    /// Defines the allocation of `resource` to `user`, named
    /// `<user>.<resource>`.
    pub fn define_allocation(&self, user: &str, resource: &str, allocation_type: &str) -> SyncResult<Allocation> {
        Ok(Allocation::define(user, resource, allocation_type)?)
    }

    /// Stores an allocation. Its user, resource and project (if set) must
    /// exist.
    pub async fn store_allocation(&self, allocation: &Allocation) -> SyncResult<()> {
        self.sync.require(EntityKind::User, [allocation.user()]).await?;
        self.sync
            .require(EntityKind::Resource, [allocation.resource()])
            .await?;
        self.sync
            .require(EntityKind::Project, allocation.project())
            .await?;
        self.sync.create(allocation).await
    }

    pub async fn list_allocations(&self) -> SyncResult<Vec<Allocation>> {
        self.sync.list().await
    }

    pub async fn get_allocation(&self, name: &str) -> SyncResult<Allocation> {
        self.sync.get(name).await
    }

    // ── Environments ─────────────────────────────────────────────

    pub fn define_environment(&self, name: &str, owner: &str) -> SyncResult<Environment> {
        Ok(Environment::define(name, owner)?)
    }

    pub async fn store_environment(&self, environment: &Environment) -> SyncResult<()> {
        self.sync
            .require(EntityKind::User, [environment.owner()])
            .await?;
        self.sync.create(environment).await
    }

    pub async fn list_environments(&self) -> SyncResult<Vec<Environment>> {
        self.sync.list().await
    }

    pub async fn get_environment(&self, name: &str) -> SyncResult<Environment> {
        self.sync.get(name).await
    }

    // ── Clusters ─────────────────────────────────────────────────

    pub fn define_cluster(&self, name: &str, owner: &str) -> SyncResult<Cluster> {
        Ok(Cluster::define(name, owner)?)
    }

    /// Stores a cluster. Its owner and every nodeset environment must exist.
    pub async fn store_cluster(&self, cluster: &Cluster) -> SyncResult<()> {
        self.sync.require(EntityKind::User, [cluster.owner()]).await?;
        self.sync
            .require(EntityKind::Environment, cluster.environments())
            .await?;
        self.sync.create(cluster).await
    }

    pub async fn list_clusters(&self) -> SyncResult<Vec<Cluster>> {
        self.sync.list().await
    }

    pub async fn get_cluster(&self, name: &str) -> SyncResult<Cluster> {
        self.sync.get(name).await
    }

    // ── Requests ─────────────────────────────────────────────────

    pub fn define_request(
        &self,
        name: &str,
        owner: &str,
        cluster: &str,
        environment: &str,
        allocations: &[&str],
        policy: &str,
    ) -> SyncResult<Request> {
        Ok(Request::define(
            name,
            owner,
            cluster,
            environment,
            allocations,
            policy,
        )?)
    }

    /// Stores a request. Its owner, cluster, environment and allocations must
    /// exist.
    pub async fn store_request(&self, request: &Request) -> SyncResult<()> {
        self.sync.require(EntityKind::User, [request.owner()]).await?;
        self.sync
            .require(EntityKind::Cluster, [request.cluster()])
            .await?;
        self.sync
            .require(EntityKind::Environment, [request.environment()])
            .await?;
        self.sync
            .require(EntityKind::Allocation, request.allocations())
            .await?;
        self.sync.create(request).await
    }

    pub async fn list_requests(&self) -> SyncResult<Vec<Request>> {
        self.sync.list().await
    }

    pub async fn get_request(&self, name: &str) -> SyncResult<Request> {
        self.sync.get(name).await
    }
}

impl From<SyncEngine> for Vc3Client {
    fn from(sync: SyncEngine) -> Self {
        Self { sync }
    }
}

