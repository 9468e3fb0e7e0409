use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct OutletVisit {
    pub id: i64,
    pub outlet_id: i64,
    pub user_id: i64,
    pub check_in_time: NaiveDateTime,
    pub check_out_time: Option<NaiveDateTime>,
    pub form_completed: bool,
    pub form_response_id: Option<i64>,
}

impl OutletVisit {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}
