use foodgram_domain::user::UserRole;

/// Only the author or a staff user may change or delete a recipe.
pub fn may_modify_recipe(caller_id: i32, caller_role: UserRole, author_id: i32) -> bool {
    caller_id == author_id || caller_role.is_staff()
}
