//! In-memory course backend for tests.
//!
//! [`MockCourseBackend`] implements all three repository traits over
//! shared in-memory state and applies the same server-side rules the
//! real backend does: the status of an enroll is decided from the
//! course's join policy, module creation without an explicit order
//! appends at the end, and the backend refuses to drop its last
//! enrolled teacher even if a buggy caller asks.
//!
//! The mock also records traffic — enroll/leave call counts and every
//! successful module update — so tests can assert which collaborator
//! calls were (not) issued, and it can be told to fail updates for a
//! specific module to exercise partial-failure paths.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;

use crate::repository::{
    CourseRepository, CreateModule, InviteMember, MembershipChanges, MembershipRepository,
    ModuleChanges, ModuleRepository,
};
use crate::types::{
    Course, CourseDetail, CourseMembership, CourseModule, CourseRole, CourseVisibility,
    MembershipStatus,
};
use crate::CourseError;

#[derive(Default)]
struct MockState {
    current_user: AtomicI64,
    courses: RwLock<HashMap<i64, Course>>,
    memberships: RwLock<HashMap<i64, CourseMembership>>,
    modules: RwLock<HashMap<i64, CourseModule>>,
    next_id: AtomicI64,
    enroll_calls: AtomicUsize,
    leave_calls: AtomicUsize,
    module_updates: Mutex<Vec<(i64, ModuleChanges)>>,
    failing_modules: RwLock<HashSet<i64>>,
}

/// An in-memory course backend. Cloning shares the underlying state, so
/// the same instance can be handed to several actions and inspected
/// afterwards.
#[derive(Clone)]
pub struct MockCourseBackend {
    state: Arc<MockState>,
}

impl MockCourseBackend {
    pub fn new() -> Self {
        let state = MockState {
            next_id: AtomicI64::new(1),
            ..MockState::default()
        };
        Self {
            state: Arc::new(state),
        }
    }

    /// Sets the authenticated user that `enroll` and `leave` act as.
    pub fn sign_in(&self, user_id: i64) {
        self.state.current_user.store(user_id, Ordering::SeqCst);
    }

    fn next_id(&self) -> i64 {
        self.state.next_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Seeds a course.
    pub fn seed_course(
        &self,
        title: &str,
        visibility: CourseVisibility,
        allow_join_requests: bool,
    ) -> Course {
        let course = Course {
            id: self.next_id(),
            title: title.to_owned(),
            outline: None,
            language: None,
            country: None,
            subject: None,
            visibility,
            start_date: chrono::Utc::now(),
            end_date: None,
            is_active: true,
            allow_join_requests,
            member_count: 0,
        };
        self.state
            .courses
            .write()
            .expect("course lock")
            .insert(course.id, course.clone());
        course
    }

    /// Seeds a membership row directly, bypassing the join policy.
    pub fn seed_member(
        &self,
        course_id: i64,
        user_id: i64,
        role: CourseRole,
        status: MembershipStatus,
    ) -> CourseMembership {
        let membership = CourseMembership {
            id: self.next_id(),
            user_id,
            user_name: format!("user{user_id}"),
            course_id,
            role,
            status,
        };
        self.state
            .memberships
            .write()
            .expect("membership lock")
            .insert(membership.id, membership.clone());
        membership
    }

    /// Seeds a content module.
    pub fn seed_module(
        &self,
        course_id: i64,
        order: u32,
        content_type: &str,
        title: Option<&str>,
    ) -> CourseModule {
        let module = CourseModule {
            id: self.next_id(),
            course_id,
            title: title.map(str::to_owned),
            order,
            content_type: content_type.to_owned(),
            object_id: Some(1),
        };
        self.state
            .modules
            .write()
            .expect("module lock")
            .insert(module.id, module.clone());
        module
    }

    /// Makes every subsequent update of `module_id` fail.
    pub fn fail_module_update(&self, module_id: i64) {
        self.state
            .failing_modules
            .write()
            .expect("failure lock")
            .insert(module_id);
    }

    /// Every successful module update issued so far, in call order.
    pub fn module_updates(&self) -> Vec<(i64, ModuleChanges)> {
        self.state.module_updates.lock().expect("update log").clone()
    }

    /// How many times `enroll` reached the backend.
    pub fn enroll_calls(&self) -> usize {
        self.state.enroll_calls.load(Ordering::SeqCst)
    }

    /// How many times `leave` reached the backend.
    pub fn leave_calls(&self) -> usize {
        self.state.leave_calls.load(Ordering::SeqCst)
    }

    fn lock_err() -> CourseError {
        CourseError::Backend("lock poisoned".into())
    }
}

impl Default for MockCourseBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CourseRepository for MockCourseBackend {
    async fn fetch_detail(&self, course_id: i64) -> Result<CourseDetail, CourseError> {
        let courses = self.state.courses.read().map_err(|_| Self::lock_err())?;
        let mut course = courses
            .get(&course_id)
            .cloned()
            .ok_or(CourseError::CourseNotFound)?;
        drop(courses);

        let memberships = self.state.memberships.read().map_err(|_| Self::lock_err())?;
        let mut members: Vec<CourseMembership> = memberships
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        drop(memberships);
        members.sort_by_key(|m| m.id);

        let modules_map = self.state.modules.read().map_err(|_| Self::lock_err())?;
        let mut modules: Vec<CourseModule> = modules_map
            .values()
            .filter(|m| m.course_id == course_id)
            .cloned()
            .collect();
        drop(modules_map);
        modules.sort_by_key(|m| (m.order, m.id));

        // annotated the way the backend annotates it: enrolled rows only
        course.member_count = members
            .iter()
            .filter(|m| m.status == MembershipStatus::Enrolled)
            .count() as u32;

        Ok(CourseDetail {
            course,
            members,
            modules,
        })
    }
}

#[async_trait]
impl MembershipRepository for MockCourseBackend {
    async fn enroll(&self, course_id: i64) -> Result<CourseMembership, CourseError> {
        self.state.enroll_calls.fetch_add(1, Ordering::SeqCst);
        let user_id = self.state.current_user.load(Ordering::SeqCst);

        let courses = self.state.courses.read().map_err(|_| Self::lock_err())?;
        let course = courses
            .get(&course_id)
            .cloned()
            .ok_or(CourseError::CourseNotFound)?;
        drop(courses);

        let mut memberships = self.state.memberships.write().map_err(|_| Self::lock_err())?;
        if memberships
            .values()
            .any(|m| m.course_id == course_id && m.user_id == user_id)
        {
            return Err(CourseError::AlreadyMember);
        }

        // the backend, not the client, decides the resulting status
        let status = match course.visibility {
            CourseVisibility::Public => MembershipStatus::Enrolled,
            CourseVisibility::Restricted if course.allow_join_requests => {
                MembershipStatus::Pending
            }
            CourseVisibility::Restricted | CourseVisibility::Private => {
                return Err(CourseError::EnrollmentClosed);
            }
        };

        let membership = CourseMembership {
            id: self.state.next_id.fetch_add(1, Ordering::SeqCst),
            user_id,
            user_name: format!("user{user_id}"),
            course_id,
            role: CourseRole::Student,
            status,
        };
        memberships.insert(membership.id, membership.clone());

        Ok(membership)
    }

    async fn leave(&self, course_id: i64) -> Result<(), CourseError> {
        self.state.leave_calls.fetch_add(1, Ordering::SeqCst);
        let user_id = self.state.current_user.load(Ordering::SeqCst);

        let mut memberships = self.state.memberships.write().map_err(|_| Self::lock_err())?;
        let own = memberships
            .values()
            .find(|m| m.course_id == course_id && m.user_id == user_id)
            .cloned()
            .ok_or(CourseError::MembershipNotFound)?;

        let stranded = own.role == CourseRole::Teacher
            && !memberships.values().any(|m| {
                m.id != own.id
                    && m.course_id == course_id
                    && m.role == CourseRole::Teacher
                    && m.status == MembershipStatus::Enrolled
            });
        if stranded {
            return Err(CourseError::LastTeacher);
        }

        memberships.remove(&own.id);
        Ok(())
    }

    async fn invite(
        &self,
        course_id: i64,
        data: InviteMember,
    ) -> Result<CourseMembership, CourseError> {
        let mut memberships = self.state.memberships.write().map_err(|_| Self::lock_err())?;
        if memberships
            .values()
            .any(|m| m.course_id == course_id && m.user_id == data.user_id)
        {
            return Err(CourseError::AlreadyMember);
        }

        let membership = CourseMembership {
            id: self.state.next_id.fetch_add(1, Ordering::SeqCst),
            user_id: data.user_id,
            user_name: format!("user{}", data.user_id),
            course_id,
            role: data.role,
            status: MembershipStatus::Invited,
        };
        memberships.insert(membership.id, membership.clone());

        Ok(membership)
    }

    async fn update(
        &self,
        course_id: i64,
        membership_id: i64,
        changes: MembershipChanges,
    ) -> Result<CourseMembership, CourseError> {
        let mut memberships = self.state.memberships.write().map_err(|_| Self::lock_err())?;
        let membership = memberships
            .get_mut(&membership_id)
            .filter(|m| m.course_id == course_id)
            .ok_or(CourseError::MembershipNotFound)?;

        if let Some(role) = changes.role {
            membership.role = role;
        }
        if let Some(status) = changes.status {
            membership.status = status;
        }

        Ok(membership.clone())
    }

    async fn remove(&self, course_id: i64, membership_id: i64) -> Result<(), CourseError> {
        let mut memberships = self.state.memberships.write().map_err(|_| Self::lock_err())?;
        let membership = memberships
            .get(&membership_id)
            .filter(|m| m.course_id == course_id)
            .cloned()
            .ok_or(CourseError::MembershipNotFound)?;

        let stranded = membership.role == CourseRole::Teacher
            && !memberships.values().any(|m| {
                m.id != membership.id
                    && m.course_id == course_id
                    && m.role == CourseRole::Teacher
                    && m.status == MembershipStatus::Enrolled
            });
        if stranded {
            return Err(CourseError::LastTeacher);
        }

        memberships.remove(&membership_id);
        Ok(())
    }
}

#[async_trait]
impl ModuleRepository for MockCourseBackend {
    async fn create(
        &self,
        course_id: i64,
        data: CreateModule,
    ) -> Result<CourseModule, CourseError> {
        let courses = self.state.courses.read().map_err(|_| Self::lock_err())?;
        if !courses.contains_key(&course_id) {
            return Err(CourseError::CourseNotFound);
        }
        drop(courses);

        let mut modules = self.state.modules.write().map_err(|_| Self::lock_err())?;

        // without an explicit order, append past the highest existing one
        let order = match data.order {
            Some(order) => order,
            None => modules
                .values()
                .filter(|m| m.course_id == course_id)
                .map(|m| m.order)
                .max()
                .map_or(0, |max| max + 1),
        };

        let module = CourseModule {
            id: self.state.next_id.fetch_add(1, Ordering::SeqCst),
            course_id,
            title: data.title,
            order,
            content_type: data.content_type,
            object_id: Some(data.object_id),
        };
        modules.insert(module.id, module.clone());

        Ok(module)
    }

    async fn update(
        &self,
        course_id: i64,
        module_id: i64,
        changes: ModuleChanges,
    ) -> Result<CourseModule, CourseError> {
        let failing = self.state.failing_modules.read().map_err(|_| Self::lock_err())?;
        if failing.contains(&module_id) {
            return Err(CourseError::Backend("injected update failure".into()));
        }
        drop(failing);

        let mut modules = self.state.modules.write().map_err(|_| Self::lock_err())?;
        let module = modules
            .get_mut(&module_id)
            .filter(|m| m.course_id == course_id)
            .ok_or(CourseError::ModuleNotFound)?;

        if let Some(title) = changes.title.clone() {
            module.title = Some(title);
        }
        if let Some(order) = changes.order {
            module.order = order;
        }
        if let Some(content_type) = changes.content_type.clone() {
            module.content_type = content_type;
        }
        if let Some(object_id) = changes.object_id {
            module.object_id = Some(object_id);
        }
        let updated = module.clone();
        drop(modules);

        self.state
            .module_updates
            .lock()
            .map_err(|_| Self::lock_err())?
            .push((module_id, changes));

        Ok(updated)
    }

    async fn delete(&self, course_id: i64, module_id: i64) -> Result<(), CourseError> {
        let mut modules = self.state.modules.write().map_err(|_| Self::lock_err())?;
        let exists = modules
            .get(&module_id)
            .is_some_and(|m| m.course_id == course_id);
        if !exists {
            return Err(CourseError::ModuleNotFound);
        }
        modules.remove(&module_id);
        Ok(())
    }
}
