pub mod figure_view;
