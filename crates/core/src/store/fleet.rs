//! Fleet store - per-entity wiring over the gateway ports

use std::sync::Arc;
use std::time::Duration;

use fleetline_common::time::Clock;
use fleetline_domain::constants::{
    CACHE_TTL_LONG_SECS, CACHE_TTL_MEDIUM_SECS, CACHE_TTL_SHORT_SECS,
};
use fleetline_domain::{
    AppSettings, Assignment, AssignmentDraft, DashboardMetrics, Driver, DriverDraft, Notification,
    Route, RouteDraft, School, SchoolDraft, Shift, ShiftDraft, Student, StudentDraft, Trip,
    TripDraft,
};
use uuid::Uuid;

use super::meta::{DocumentSnapshot, FetchOutcome, MutationOutcome, Snapshot};
use super::slot::{merge_upsert, DocumentSlot, EntitySlot, Identified};
use crate::ports::{
    AssignmentsGateway, DashboardGateway, DriversGateway, NotificationsGateway, RoutesGateway,
    SchoolsGateway, SettingsGateway, ShiftsGateway, StudentsGateway, TripsGateway,
};

impl Identified for School {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Driver {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Route {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Trip {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Student {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Assignment {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Shift {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}
impl Identified for Notification {
    fn entity_id(&self) -> Uuid {
        self.id
    }
}

/// The gateway set the store is wired with.
///
/// Bundled into one struct so the composition root builds it field by field
/// instead of threading ten constructor arguments.
pub struct FleetGateways {
    pub schools: Arc<dyn SchoolsGateway>,
    pub drivers: Arc<dyn DriversGateway>,
    pub routes: Arc<dyn RoutesGateway>,
    pub trips: Arc<dyn TripsGateway>,
    pub students: Arc<dyn StudentsGateway>,
    pub assignments: Arc<dyn AssignmentsGateway>,
    pub shifts: Arc<dyn ShiftsGateway>,
    pub notifications: Arc<dyn NotificationsGateway>,
    pub settings: Arc<dyn SettingsGateway>,
    pub dashboard: Arc<dyn DashboardGateway>,
}

/// One store for every entity the dashboard works with.
///
/// Volatile collections (trips, notifications) and the dashboard document
/// use the short TTL class, reference data the medium class, and the
/// settings document the long class. `fetch_*(false)` inside the window is
/// a no-op; mutations merge optimistically and never wait for a re-fetch.
pub struct FleetStore {
    gateways: FleetGateways,
    schools: EntitySlot<School>,
    drivers: EntitySlot<Driver>,
    routes: EntitySlot<Route>,
    trips: EntitySlot<Trip>,
    students: EntitySlot<Student>,
    assignments: EntitySlot<Assignment>,
    shifts: EntitySlot<Shift>,
    notifications: EntitySlot<Notification>,
    settings: DocumentSlot<AppSettings>,
    dashboard: DocumentSlot<DashboardMetrics>,
}

impl FleetStore {
    /// Build a store over the given gateways and clock.
    pub fn new(gateways: FleetGateways, clock: Arc<dyn Clock>) -> Self {
        let short = Duration::from_secs(CACHE_TTL_SHORT_SECS);
        let medium = Duration::from_secs(CACHE_TTL_MEDIUM_SECS);
        let long = Duration::from_secs(CACHE_TTL_LONG_SECS);

        Self {
            schools: EntitySlot::new("schools", medium, Arc::clone(&clock)),
            drivers: EntitySlot::new("drivers", medium, Arc::clone(&clock)),
            routes: EntitySlot::new("routes", medium, Arc::clone(&clock)),
            trips: EntitySlot::new("trips", short, Arc::clone(&clock)),
            students: EntitySlot::new("students", medium, Arc::clone(&clock)),
            assignments: EntitySlot::new("assignments", medium, Arc::clone(&clock)),
            shifts: EntitySlot::new("shifts", medium, Arc::clone(&clock)),
            notifications: EntitySlot::new("notifications", short, Arc::clone(&clock)),
            settings: DocumentSlot::new("settings", long, Arc::clone(&clock)),
            dashboard: DocumentSlot::new("dashboard", short, clock),
            gateways,
        }
    }

    // ------------------------------------------------------------------
    // Schools
    // ------------------------------------------------------------------

    pub fn schools(&self) -> Snapshot<School> {
        self.schools.snapshot()
    }

    pub async fn fetch_schools(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.schools);
        self.schools.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_school(&self, draft: SchoolDraft) -> MutationOutcome<School> {
        let gateway = Arc::clone(&self.gateways.schools);
        self.schools
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_school(&self, id: Uuid, draft: SchoolDraft) -> MutationOutcome<School> {
        let gateway = Arc::clone(&self.gateways.schools);
        self.schools
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_school(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.schools);
        self.schools.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Drivers
    // ------------------------------------------------------------------

    pub fn drivers(&self) -> Snapshot<Driver> {
        self.drivers.snapshot()
    }

    pub async fn fetch_drivers(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.drivers);
        self.drivers.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_driver(&self, draft: DriverDraft) -> MutationOutcome<Driver> {
        let gateway = Arc::clone(&self.gateways.drivers);
        self.drivers
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_driver(&self, id: Uuid, draft: DriverDraft) -> MutationOutcome<Driver> {
        let gateway = Arc::clone(&self.gateways.drivers);
        self.drivers
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_driver(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.drivers);
        self.drivers.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Routes
    // ------------------------------------------------------------------

    pub fn routes(&self) -> Snapshot<Route> {
        self.routes.snapshot()
    }

    pub async fn fetch_routes(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.routes);
        self.routes.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_route(&self, draft: RouteDraft) -> MutationOutcome<Route> {
        let gateway = Arc::clone(&self.gateways.routes);
        self.routes
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_route(&self, id: Uuid, draft: RouteDraft) -> MutationOutcome<Route> {
        let gateway = Arc::clone(&self.gateways.routes);
        self.routes
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_route(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.routes);
        self.routes.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Trips
    // ------------------------------------------------------------------

    pub fn trips(&self) -> Snapshot<Trip> {
        self.trips.snapshot()
    }

    pub async fn fetch_trips(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.trips);
        self.trips.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_trip(&self, draft: TripDraft) -> MutationOutcome<Trip> {
        let gateway = Arc::clone(&self.gateways.trips);
        self.trips.mutate_with(async move { gateway.create(&draft).await }, merge_upsert).await
    }

    pub async fn update_trip(&self, id: Uuid, draft: TripDraft) -> MutationOutcome<Trip> {
        let gateway = Arc::clone(&self.gateways.trips);
        self.trips
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_trip(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.trips);
        self.trips.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Students
    // ------------------------------------------------------------------

    pub fn students(&self) -> Snapshot<Student> {
        self.students.snapshot()
    }

    pub async fn fetch_students(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.students);
        self.students.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_student(&self, draft: StudentDraft) -> MutationOutcome<Student> {
        let gateway = Arc::clone(&self.gateways.students);
        self.students
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_student(&self, id: Uuid, draft: StudentDraft) -> MutationOutcome<Student> {
        let gateway = Arc::clone(&self.gateways.students);
        self.students
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_student(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.students);
        self.students.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Assignments
    // ------------------------------------------------------------------

    pub fn assignments(&self) -> Snapshot<Assignment> {
        self.assignments.snapshot()
    }

    pub async fn fetch_assignments(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.assignments);
        self.assignments.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_assignment(&self, draft: AssignmentDraft) -> MutationOutcome<Assignment> {
        let gateway = Arc::clone(&self.gateways.assignments);
        self.assignments
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_assignment(
        &self,
        id: Uuid,
        draft: AssignmentDraft,
    ) -> MutationOutcome<Assignment> {
        let gateway = Arc::clone(&self.gateways.assignments);
        self.assignments
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_assignment(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.assignments);
        self.assignments.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Shifts
    // ------------------------------------------------------------------

    pub fn shifts(&self) -> Snapshot<Shift> {
        self.shifts.snapshot()
    }

    pub async fn fetch_shifts(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.shifts);
        self.shifts.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn create_shift(&self, draft: ShiftDraft) -> MutationOutcome<Shift> {
        let gateway = Arc::clone(&self.gateways.shifts);
        self.shifts
            .mutate_with(async move { gateway.create(&draft).await }, merge_upsert)
            .await
    }

    pub async fn update_shift(&self, id: Uuid, draft: ShiftDraft) -> MutationOutcome<Shift> {
        let gateway = Arc::clone(&self.gateways.shifts);
        self.shifts
            .mutate_with(async move { gateway.update(id, &draft).await }, merge_upsert)
            .await
    }

    pub async fn delete_shift(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.shifts);
        self.shifts.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Notifications
    // ------------------------------------------------------------------

    pub fn notifications(&self) -> Snapshot<Notification> {
        self.notifications.snapshot()
    }

    pub async fn fetch_notifications(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.notifications);
        self.notifications.fetch_with(force, async move { gateway.list().await }).await
    }

    pub async fn mark_notification_read(&self, id: Uuid) -> MutationOutcome<Notification> {
        let gateway = Arc::clone(&self.gateways.notifications);
        self.notifications
            .mutate_with(async move { gateway.mark_read(id).await }, merge_upsert)
            .await
    }

    pub async fn delete_notification(&self, id: Uuid) -> MutationOutcome<Uuid> {
        let gateway = Arc::clone(&self.gateways.notifications);
        self.notifications.delete_with(id, async move { gateway.delete(id).await }).await
    }

    // ------------------------------------------------------------------
    // Settings and dashboard documents
    // ------------------------------------------------------------------

    pub fn settings(&self) -> DocumentSnapshot<AppSettings> {
        self.settings.snapshot()
    }

    pub async fn fetch_settings(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.settings);
        self.settings.fetch_with(force, async move { gateway.get().await }).await
    }

    pub async fn update_settings(&self, settings: AppSettings) -> MutationOutcome<AppSettings> {
        let gateway = Arc::clone(&self.gateways.settings);
        self.settings.mutate_with(async move { gateway.update(&settings).await }).await
    }

    pub fn dashboard(&self) -> DocumentSnapshot<DashboardMetrics> {
        self.dashboard.snapshot()
    }

    pub async fn fetch_dashboard(&self, force: bool) -> FetchOutcome {
        let gateway = Arc::clone(&self.gateways.dashboard);
        self.dashboard.fetch_with(force, async move { gateway.get().await }).await
    }
}
