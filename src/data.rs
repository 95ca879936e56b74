use serde::Deserialize;

pub mod admission_date;
pub mod student;

#[derive(Deserialize)]
pub struct IdForm {
    pub id: String,
}
