pub mod answer_panel;
pub mod passage_view;
pub mod question_list;
