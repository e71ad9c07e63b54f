//! Права на мутирующие действия со страницы записи.

use crate::models::Post;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Какие мутирующие элементы показывать на странице записи.
pub struct RecordAccess {
    /// Кнопка «Редактировать».
    pub can_edit: bool,
    /// Кнопка «Удалить».
    pub can_delete: bool,
    /// Форма ответа администратора.
    pub can_answer: bool,
}

impl RecordAccess {
    /// Редактирование и удаление доступны автору или администратору, ответ только администратору.
    pub fn from_flags(is_owner: bool, is_admin: bool) -> Self {
        let can_mutate = is_owner || is_admin;
        Self {
            can_edit: can_mutate,
            can_delete: can_mutate,
            can_answer: is_admin,
        }
    }

    /// Флаги из загруженной записи.
    pub fn for_post(post: &Post) -> Self {
        Self::from_flags(post.is_owner, post.is_admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_and_delete_iff_owner_or_admin() {
        for (owner, admin) in [(false, false), (true, false), (false, true), (true, true)] {
            let access = RecordAccess::from_flags(owner, admin);
            assert_eq!(access.can_edit, owner || admin);
            assert_eq!(access.can_delete, owner || admin);
            assert_eq!(access.can_answer, admin);
        }
    }
}
