mod fn_ptr;
mod option;
mod pointer;
mod scalar;
mod tuple;

pub(crate) use tuple::write_type_name_list;
