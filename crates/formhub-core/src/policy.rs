//! Access-scoping policy.
//!
//! Pure decision logic: given the resolved [`Caller`] and the owner
//! fields of a record, decide what the caller may see or change. Every
//! handler goes through these functions; none of them touch storage.
//!
//! An employee without a linked admin never falls back to a wider view.
//! Listings resolve to nothing and single-record access is denied.

use uuid::Uuid;

use crate::error::{FormHubError, FormHubResult};
use crate::models::form::Form;
use crate::models::submission::Submission;
use crate::models::user::{User, UserRole};

/// The principal behind a request, as the policy sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: Uuid,
    pub role: UserRole,
    /// Only meaningful for [`UserRole::User`].
    pub linked_admin: Option<Uuid>,
}

impl Caller {
    pub fn admin(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: UserRole::Admin,
            linked_admin: None,
        }
    }

    pub fn employee(user_id: Uuid, linked_admin: Option<Uuid>) -> Self {
        Self {
            user_id,
            role: UserRole::User,
            linked_admin,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// The admin whose forms this caller works with: themselves for an
    /// admin, the linked admin for an employee.
    pub fn scope_owner(&self) -> Option<Uuid> {
        match self.role {
            UserRole::Admin => Some(self.user_id),
            UserRole::User => self.linked_admin,
        }
    }
}

impl From<&User> for Caller {
    fn from(user: &User) -> Self {
        match user.role {
            UserRole::Admin => Caller::admin(user.id),
            UserRole::User => Caller::employee(user.id, user.linked_admin),
        }
    }
}

/// Which forms a form listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormListScope {
    OwnedBy(Uuid),
    Nothing,
}

/// Which submissions of a form a submission listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionListScope {
    All,
    SubmittedBy(Uuid),
}

pub fn form_list_scope(caller: &Caller) -> FormListScope {
    match caller.scope_owner() {
        Some(owner) => FormListScope::OwnedBy(owner),
        None => FormListScope::Nothing,
    }
}

pub fn can_view_form(caller: &Caller, form_owner: Uuid) -> bool {
    caller.scope_owner() == Some(form_owner)
}

pub fn authorize_form_read(caller: &Caller, form: &Form) -> FormHubResult<()> {
    if can_view_form(caller, form.created_by) {
        Ok(())
    } else {
        Err(FormHubError::denied("form belongs to another organization"))
    }
}

pub fn authorize_form_create(caller: &Caller) -> FormHubResult<()> {
    if caller.is_admin() {
        Ok(())
    } else {
        Err(FormHubError::denied("only admins can create forms"))
    }
}

/// Update and delete: the owning admin only.
pub fn authorize_form_write(caller: &Caller, form: &Form) -> FormHubResult<()> {
    if !caller.is_admin() {
        return Err(FormHubError::denied("only admins can modify forms"));
    }
    if form.created_by != caller.user_id {
        return Err(FormHubError::denied("form is owned by another admin"));
    }
    Ok(())
}

/// Employees submit to their linked admin's forms. Admins are only let
/// through for forms they own.
pub fn authorize_submission_create(caller: &Caller, form: &Form) -> FormHubResult<()> {
    if can_view_form(caller, form.created_by) {
        Ok(())
    } else {
        Err(FormHubError::denied(
            "cannot submit to a form outside your organization",
        ))
    }
}

pub fn submission_list_scope(caller: &Caller, form: &Form) -> FormHubResult<SubmissionListScope> {
    match caller.role {
        UserRole::Admin if form.created_by == caller.user_id => Ok(SubmissionListScope::All),
        UserRole::Admin => Err(FormHubError::denied("form is owned by another admin")),
        UserRole::User if can_view_form(caller, form.created_by) => {
            Ok(SubmissionListScope::SubmittedBy(caller.user_id))
        }
        UserRole::User => Err(FormHubError::denied(
            "form belongs to another organization",
        )),
    }
}

/// Read and edit of a single submission: its author, or the admin that
/// owns the parent form.
pub fn authorize_submission_access(
    caller: &Caller,
    form: &Form,
    submission: &Submission,
) -> FormHubResult<()> {
    let allowed = match caller.role {
        UserRole::Admin => form.created_by == caller.user_id,
        UserRole::User => submission.submitted_by == caller.user_id,
    };
    if allowed {
        Ok(())
    } else {
        Err(FormHubError::denied(
            "submission belongs to another user or organization",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::form::{FieldKind, FormField};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn form_owned_by(owner: Uuid) -> Form {
        Form {
            id: Uuid::new_v4(),
            name: "Intake".into(),
            fields: vec![FormField {
                id: "f1".into(),
                kind: FieldKind::Text,
                label: "Name".into(),
                required: true,
            }],
            created_by: owner,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn submission_by(form: &Form, author: Uuid) -> Submission {
        Submission {
            id: Uuid::new_v4(),
            form_id: form.id,
            submitted_by: author,
            values: BTreeMap::new(),
            is_edited: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn is_denied<T>(result: FormHubResult<T>) -> bool {
        matches!(result, Err(FormHubError::AuthorizationDenied { .. }))
    }

    #[test]
    fn admin_lists_own_forms() {
        let admin = Caller::admin(Uuid::new_v4());
        assert_eq!(
            form_list_scope(&admin),
            FormListScope::OwnedBy(admin.user_id)
        );
    }

    #[test]
    fn employee_lists_linked_admin_forms() {
        let admin_id = Uuid::new_v4();
        let employee = Caller::employee(Uuid::new_v4(), Some(admin_id));
        assert_eq!(form_list_scope(&employee), FormListScope::OwnedBy(admin_id));
    }

    #[test]
    fn unlinked_employee_lists_nothing() {
        let employee = Caller::employee(Uuid::new_v4(), None);
        assert_eq!(form_list_scope(&employee), FormListScope::Nothing);
    }

    #[test]
    fn foreign_admin_cannot_read_form() {
        let form = form_owned_by(Uuid::new_v4());
        let other = Caller::admin(Uuid::new_v4());
        assert!(is_denied(authorize_form_read(&other, &form)));
        assert!(authorize_form_read(&Caller::admin(form.created_by), &form).is_ok());
    }

    #[test]
    fn employee_reads_only_linked_admin_forms() {
        let form = form_owned_by(Uuid::new_v4());
        let linked = Caller::employee(Uuid::new_v4(), Some(form.created_by));
        let foreign = Caller::employee(Uuid::new_v4(), Some(Uuid::new_v4()));
        let unlinked = Caller::employee(Uuid::new_v4(), None);

        assert!(authorize_form_read(&linked, &form).is_ok());
        assert!(is_denied(authorize_form_read(&foreign, &form)));
        assert!(is_denied(authorize_form_read(&unlinked, &form)));
    }

    #[test]
    fn employee_id_matching_owner_is_not_an_admin() {
        // An employee whose own id equals the owner id must not be treated
        // as the owner; only the linked admin counts.
        let owner = Uuid::new_v4();
        let form = form_owned_by(owner);
        let employee = Caller::employee(owner, None);
        assert!(is_denied(authorize_form_read(&employee, &form)));
    }

    #[test]
    fn only_admins_create_forms() {
        assert!(authorize_form_create(&Caller::admin(Uuid::new_v4())).is_ok());
        let employee = Caller::employee(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(is_denied(authorize_form_create(&employee)));
    }

    #[test]
    fn only_owner_writes_form() {
        let form = form_owned_by(Uuid::new_v4());
        assert!(authorize_form_write(&Caller::admin(form.created_by), &form).is_ok());
        assert!(is_denied(authorize_form_write(
            &Caller::admin(Uuid::new_v4()),
            &form
        )));
        let employee = Caller::employee(Uuid::new_v4(), Some(form.created_by));
        assert!(is_denied(authorize_form_write(&employee, &form)));
    }

    #[test]
    fn submission_create_requires_matching_organization() {
        let form = form_owned_by(Uuid::new_v4());
        let linked = Caller::employee(Uuid::new_v4(), Some(form.created_by));
        let foreign = Caller::employee(Uuid::new_v4(), Some(Uuid::new_v4()));
        assert!(authorize_submission_create(&linked, &form).is_ok());
        assert!(is_denied(authorize_submission_create(&foreign, &form)));
        assert!(is_denied(authorize_submission_create(
            &Caller::employee(Uuid::new_v4(), None),
            &form
        )));
    }

    #[test]
    fn submission_listing_scopes() {
        let form = form_owned_by(Uuid::new_v4());
        let owner = Caller::admin(form.created_by);
        let employee = Caller::employee(Uuid::new_v4(), Some(form.created_by));

        assert_eq!(
            submission_list_scope(&owner, &form).unwrap(),
            SubmissionListScope::All
        );
        assert_eq!(
            submission_list_scope(&employee, &form).unwrap(),
            SubmissionListScope::SubmittedBy(employee.user_id)
        );
        assert!(is_denied(submission_list_scope(
            &Caller::admin(Uuid::new_v4()),
            &form
        )));
    }

    #[test]
    fn employee_outside_organization_cannot_list_submissions() {
        let form = form_owned_by(Uuid::new_v4());
        let foreign = Caller::employee(Uuid::new_v4(), Some(Uuid::new_v4()));
        let unlinked = Caller::employee(Uuid::new_v4(), None);

        assert!(is_denied(submission_list_scope(&foreign, &form)));
        assert!(is_denied(submission_list_scope(&unlinked, &form)));
    }

    #[test]
    fn submission_access_for_author_and_form_owner_only() {
        let form = form_owned_by(Uuid::new_v4());
        let author = Caller::employee(Uuid::new_v4(), Some(form.created_by));
        let colleague = Caller::employee(Uuid::new_v4(), Some(form.created_by));
        let submission = submission_by(&form, author.user_id);

        assert!(authorize_submission_access(&author, &form, &submission).is_ok());
        assert!(
            authorize_submission_access(&Caller::admin(form.created_by), &form, &submission)
                .is_ok()
        );
        assert!(is_denied(authorize_submission_access(
            &colleague,
            &form,
            &submission
        )));
        assert!(is_denied(authorize_submission_access(
            &Caller::admin(Uuid::new_v4()),
            &form,
            &submission
        )));
    }
}
