pub mod section_list;
