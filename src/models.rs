use serde::{Deserialize, Serialize};

/// One row of the employee work-pattern dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee_ID")]
    pub employee_id: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Sub_Team")]
    pub sub_team: String,
    #[serde(rename = "Total_Weekly_Hours")]
    pub total_weekly_hours: f64,
    #[serde(rename = "Overtime_Hours")]
    pub overtime_hours: f64,
    #[serde(rename = "Projects_Completed", default)]
    pub projects_completed: Option<u32>,
    #[serde(rename = "Avg_Days_Early")]
    pub avg_days_early: f64,
    #[serde(rename = "Value_Score", default)]
    pub value_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoredEmployee {
    pub record: EmployeeRecord,
    /// Formula output before clamping; may fall outside [0, 100].
    pub raw_score: f64,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentScore {
    pub department: String,
    pub avg_score: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubTeamScore {
    pub department: String,
    pub sub_team: String,
    pub avg_score: f64,
    pub avg_hours: f64,
    pub avg_overtime: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub company_avg: f64,
    pub departments: Vec<DepartmentScore>,
    pub sub_teams: Vec<SubTeamScore>,
}
