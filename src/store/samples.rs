use chrono::{DateTime, TimeZone, Utc};

use crate::models::NewPerson;

fn born(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// The demonstration people, with fixed birth dates
pub fn sample_people() -> Vec<NewPerson> {
    vec![
        NewPerson::new("Jean", "Dupont", 30).born_on(born(1994, 3, 15)),
        NewPerson::new("Marie", "Martin", 25)
            .with_department("HR")
            .with_flag(false)
            .born_on(born(1999, 7, 22)),
        NewPerson::new("Pierre", "Bernard", 40)
            .with_department("Finance")
            .with_country("Belgique")
            .born_on(born(1984, 11, 3)),
        NewPerson::new("Sophie", "Dubois", 20)
            .with_department("Marketing")
            .born_on(born(2004, 1, 9)),
        NewPerson::new("Luc", "Moreau", 35)
            .with_country("Suisse")
            .with_flag(false)
            .born_on(born(1989, 5, 30)),
        NewPerson::new("Isabelle", "Rousseau", 26)
            .with_department("Marketing")
            .born_on(born(1998, 9, 12)),
        NewPerson::new("Marc", "Lefevre", 45)
            .with_country("Canada")
            .with_flag(false)
            .born_on(born(1979, 2, 18)),
        NewPerson::new("Claire", "Fontaine", 19)
            .with_department("HR")
            .with_country("Belgique")
            .born_on(born(2005, 6, 1)),
    ]
}
