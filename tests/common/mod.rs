// Upstream simulado para las pruebas: cuenta llamadas y permite demorar o
// hacer fallar cada recurso.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use semanario::error::TimetableError;
use semanario::loader::Clock;
use semanario::models::ScheduleEntry;
use semanario::upstream::{SectionPayload, SemesterPayload, TimetableApi};

pub struct MockApi {
    pub semester_calls: AtomicUsize,
    pub sections_calls: AtomicUsize,
    pub schedule_calls: AtomicUsize,
    semester: Mutex<Result<SemesterPayload, TimetableError>>,
    sections: Mutex<Result<Vec<SectionPayload>, TimetableError>>,
    week_delays_ms: Mutex<HashMap<u32, u64>>,
    failing_weeks: Mutex<HashSet<u32>>,
    delay_ms: u64,
}

pub fn spring_2024() -> SemesterPayload {
    SemesterPayload {
        semester_id: Some(1),
        semester_name: Some("2024 Spring".to_string()),
        start_date: Some("2024-02-26".to_string()),
        end_date: Some("2024-07-07".to_string()),
        term_type: Some("spring".to_string()),
        academic_year: Some("2023-2024".to_string()),
    }
}

pub fn section(id: u32, start: &str, end: &str) -> SectionPayload {
    SectionPayload {
        section_id: Some(id),
        start_time: Some(start.to_string()),
        end_time: Some(end.to_string()),
        period_type: None,
        campus: None,
    }
}

pub fn default_sections() -> Vec<SectionPayload> {
    vec![section(2, "08:55", "09:40"), section(1, "08:00", "08:45"), section(3, "14:00", "14:45")]
}

/// Miércoles de la tercera semana del semestre de prueba.
pub fn fixed_clock() -> Clock {
    Arc::new(|| NaiveDate::from_ymd_opt(2024, 3, 13).unwrap())
}

impl MockApi {
    pub fn new() -> Self {
        MockApi {
            semester_calls: AtomicUsize::new(0),
            sections_calls: AtomicUsize::new(0),
            schedule_calls: AtomicUsize::new(0),
            semester: Mutex::new(Ok(spring_2024())),
            sections: Mutex::new(Ok(default_sections())),
            week_delays_ms: Mutex::new(HashMap::new()),
            failing_weeks: Mutex::new(HashSet::new()),
            delay_ms: 10,
        }
    }

    pub fn set_semester(&self, result: Result<SemesterPayload, TimetableError>) {
        *self.semester.lock().unwrap() = result;
    }

    pub fn set_sections(&self, result: Result<Vec<SectionPayload>, TimetableError>) {
        *self.sections.lock().unwrap() = result;
    }

    pub fn delay_week(&self, week: u32, ms: u64) {
        self.week_delays_ms.lock().unwrap().insert(week, ms);
    }

    pub fn fail_week(&self, week: u32) {
        self.failing_weeks.lock().unwrap().insert(week);
    }

    pub fn calls(&self) -> (usize, usize, usize) {
        (
            self.semester_calls.load(Ordering::SeqCst),
            self.sections_calls.load(Ordering::SeqCst),
            self.schedule_calls.load(Ordering::SeqCst),
        )
    }
}

/// Una entrada por semana pedida; `schedule_id` = semana, para reconocerla.
pub fn entry_for(week: u32) -> ScheduleEntry {
    ScheduleEntry {
        schedule_id: week as i64,
        semester_id: Some(1),
        course_id: 100 + week as i64,
        teacher_id: "T001".to_string(),
        classroom_id: 12,
        section_id: 1,
        week_day: 1,
        weeks: week.to_string(),
        course_name: Some(format!("Curso semana {}", week)),
        course_code: None,
        teacher_name: None,
        classroom_building: None,
        classroom_room_number: None,
        start_time: None,
        end_time: None,
        credit: None,
    }
}

#[async_trait]
impl TimetableApi for MockApi {
    async fn get_current_semester(&self) -> Result<SemesterPayload, TimetableError> {
        self.semester_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.semester.lock().unwrap().clone()
    }

    async fn get_all_sections(&self) -> Result<Vec<SectionPayload>, TimetableError> {
        self.sections_calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
        self.sections.lock().unwrap().clone()
    }

    async fn get_schedule_for_week(&self, _semester_id: i64, week: u32) -> Result<Vec<ScheduleEntry>, TimetableError> {
        self.schedule_calls.fetch_add(1, Ordering::SeqCst);
        let delay = self.week_delays_ms.lock().unwrap().get(&week).copied().unwrap_or(self.delay_ms);
        tokio::time::sleep(Duration::from_millis(delay)).await;
        if self.failing_weeks.lock().unwrap().contains(&week) {
            return Err(TimetableError::fetch(format!("week {} unavailable", week), "unable to load schedule"));
        }
        Ok(vec![entry_for(week)])
    }
}
