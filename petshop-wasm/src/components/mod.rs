pub(crate) mod chat_widget;
pub(crate) mod layout;
pub(crate) mod pager;
