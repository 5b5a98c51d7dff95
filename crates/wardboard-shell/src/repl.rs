//! Read-eval loop over the core's screen models.

use std::io::{self, Write};

use anyhow::Result;

use wardboard_core::ui::{
    AdmissionOutcome, FieldKindChoice, RoomDetail, RoomGrid, SettingsScreen, Widget,
};
use wardboard_core::{Database, Sex};

enum Screen {
    Grid,
    Settings(SettingsScreen),
    Detail(RoomDetail),
}

pub fn run(mut db: Database) -> Result<()> {
    let mut screen = Screen::Grid;

    loop {
        match &screen {
            Screen::Grid => render_grid(&db)?,
            Screen::Settings(settings) => render_settings(settings),
            Screen::Detail(detail) => render_detail(detail),
        }

        let line = match read_line("> ")? {
            Some(line) => line,
            None => return Ok(()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" {
            return Ok(());
        }

        screen = match screen {
            Screen::Grid => on_grid_command(&db, line)?,
            Screen::Settings(settings) => on_settings_command(&mut db, settings, line)?,
            Screen::Detail(detail) => on_detail_command(&mut db, detail, line)?,
        };
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render_grid(db: &Database) -> Result<()> {
    let grid = RoomGrid::load(db)?;
    println!("\n== Rooms ==");
    for tile in &grid.tiles {
        match &tile.occupant {
            Some(name) => println!("  [{:>3}] {}", tile.room_number, name),
            None => println!("  [{:>3}] -", tile.room_number),
        }
    }
    println!("commands: <room> | settings | quit");
    Ok(())
}

fn render_settings(settings: &SettingsScreen) {
    println!("\n== Settings ==");
    println!("rooms: {}", settings.rooms_text);
    println!("doctors:");
    for doctor in &settings.doctors {
        println!("  - {}", doctor);
    }
    println!("researches:");
    for research in &settings.researches {
        println!(
            "  [{}] {} ({} fields)",
            research.research_id,
            research.research_name,
            research.fields.len()
        );
    }
    if !settings.draft_name.is_empty() || !settings.draft_fields.is_empty() {
        println!("draft research: {}", settings.draft_name);
        for (i, row) in settings.draft_fields.iter().enumerate() {
            if row.options_visible() {
                println!("  {}: {} ({}) [{}]", i, row.name, row.kind.label(), row.options_text);
            } else {
                println!("  {}: {} ({})", i, row.name, row.kind.label());
            }
        }
    }
    println!(
        "commands: rooms <csv> | doctor add/rm <name> | save | research name <text> | \
         field add | field <i> name/type/options <v> | field rm <i> | research save | \
         research rm <id> | back"
    );
}

fn render_detail(detail: &RoomDetail) {
    match detail {
        RoomDetail::Occupied(room) => {
            println!("\n== Room {} ==", room.room_number);
            let p = &room.patient;
            println!(
                "  {} ({}), age {}, {}, admitted {} under {}",
                p.name,
                p.patient_id,
                p.age,
                p.sex.as_str(),
                p.admission_date,
                p.doctor
            );
            println!("researches:");
            for research in &room.researches {
                println!("  [{}] {}", research.research_id, research.research_name);
            }
            if let Some(form) = &room.form {
                println!("form: {}", form.research_name);
                for input in &form.inputs {
                    match input.widget() {
                        Widget::TextBox { value } => println!("  {} (text): {}", input.def.name, value),
                        Widget::NumberBox { value } => println!("  {} (number): {}", input.def.name, value),
                        Widget::DateBox { value } => println!("  {} (date): {}", input.def.name, value),
                        Widget::Select { options, selected } => {
                            let shown: Vec<String> = options
                                .iter()
                                .enumerate()
                                .map(|(i, o)| {
                                    if selected == Some(i) {
                                        format!("[{}]", o)
                                    } else {
                                        o.clone()
                                    }
                                })
                                .collect();
                            println!("  {} (select): {}", input.def.name, shown.join(" "));
                        }
                    }
                }
            }
            println!("commands: research <id> | set <field>=<value> | save | discharge | back");
        }
        RoomDetail::Vacant(form) => {
            println!("\n== Room {} (vacant) ==", form.room_number);
            println!("  id: {}", form.patient_id);
            println!("  name: {}", form.name);
            println!("  age: {}", form.age);
            println!("  sex: {}", form.sex.as_str());
            println!("  doctor: {} (of {:?})", form.doctor, form.doctors);
            println!("  date: {}", form.admission_date);
            println!("commands: id/name/age/sex/doctor/date <value> | admit | back");
        }
    }
}

// ---------------------------------------------------------------------------
// Command handling
// ---------------------------------------------------------------------------

fn on_grid_command(db: &Database, line: &str) -> Result<Screen> {
    if line == "settings" {
        return Ok(Screen::Settings(SettingsScreen::load(db)?));
    }
    Ok(Screen::Detail(RoomDetail::load(db, line)?))
}

fn on_settings_command(db: &mut Database, mut settings: SettingsScreen, line: &str) -> Result<Screen> {
    let (cmd, rest) = split_command(line);
    match (cmd, rest) {
        ("back", _) => return Ok(Screen::Grid),
        ("rooms", text) => settings.rooms_text = text.to_string(),
        ("doctor", rest) => {
            let (sub, name) = split_command(rest);
            match sub {
                "add" => settings.add_doctor(name),
                "rm" => settings.remove_doctor(name),
                _ => println!("unknown doctor command"),
            }
        }
        ("save", _) => match settings.save_general(db) {
            Ok(()) => {
                println!("rooms and doctors saved");
                return Ok(Screen::Grid);
            }
            Err(e) => println!("error: {}", e),
        },
        ("research", rest) => {
            let (sub, arg) = split_command(rest);
            match sub {
                "name" => settings.draft_name = arg.to_string(),
                "save" => match settings.save_research(db) {
                    Ok(id) => println!("research saved with id {}", id),
                    Err(e) => println!("error: {}", e),
                },
                "rm" => match arg.parse::<i64>() {
                    Ok(id) => {
                        if confirm("Delete this research? Saved data is kept.")? {
                            match settings.delete_research(db, id) {
                                Ok(true) => println!("research deleted"),
                                Ok(false) => println!("no research with id {}", id),
                                Err(e) => println!("error: {}", e),
                            }
                        }
                    }
                    Err(_) => println!("'{}' is not a research id", arg),
                },
                _ => println!("unknown research command"),
            }
        }
        ("field", rest) => on_field_command(&mut settings, rest),
        _ => println!("unknown command"),
    }
    Ok(Screen::Settings(settings))
}

fn on_field_command(settings: &mut SettingsScreen, rest: &str) {
    let (first, tail) = split_command(rest);
    match first {
        "add" => {
            settings.add_field_row();
        }
        "rm" => match tail.parse::<usize>() {
            Ok(index) => settings.remove_field_row(index),
            Err(_) => println!("'{}' is not a row index", tail),
        },
        index => {
            let Ok(index) = index.parse::<usize>() else {
                println!("unknown field command");
                return;
            };
            let Some(row) = settings.draft_fields.get_mut(index) else {
                println!("no field row {}", index);
                return;
            };
            let (attr, value) = split_command(tail);
            match attr {
                "name" => row.name = value.to_string(),
                "type" => match FieldKindChoice::from_label(value) {
                    Some(kind) => row.kind = kind,
                    None => println!("field types: text, number, date, select"),
                },
                "options" => row.options_text = value.to_string(),
                _ => println!("field attributes: name, type, options"),
            }
        }
    }
}

fn on_detail_command(db: &mut Database, detail: RoomDetail, line: &str) -> Result<Screen> {
    let (cmd, rest) = split_command(line);
    match detail {
        RoomDetail::Occupied(mut room) => {
            match (cmd, rest) {
                ("back", _) => return Ok(Screen::Grid),
                ("discharge", _) => {
                    let prompt = format!("Discharge {}?", room.patient.name);
                    if confirm(&prompt)? {
                        match room.discharge(db) {
                            Ok(()) => {
                                println!("patient discharged");
                                return Ok(Screen::Detail(RoomDetail::load(db, &room.room_number)?));
                            }
                            Err(e) => println!("error: {}", e),
                        }
                    }
                }
                ("research", arg) => match arg.parse::<i64>() {
                    Ok(id) => {
                        if let Err(e) = room.select_research(db, id) {
                            println!("error: {}", e);
                        }
                    }
                    Err(_) => println!("'{}' is not a research id", arg),
                },
                ("set", assignment) => match room.form.as_mut() {
                    Some(form) => match assignment.split_once('=') {
                        Some((field, value)) => {
                            if let Err(e) = form.set_value(field.trim(), value.trim()) {
                                println!("error: {}", e);
                            }
                        }
                        None => println!("usage: set <field>=<value>"),
                    },
                    None => println!("select a research first"),
                },
                ("save", _) => match room.form.as_mut() {
                    Some(form) => match form.save(db) {
                        Ok(()) => println!("research data saved"),
                        Err(e) => println!("error: {}", e),
                    },
                    None => println!("select a research first"),
                },
                _ => println!("unknown command"),
            }
            Ok(Screen::Detail(RoomDetail::Occupied(room)))
        }
        RoomDetail::Vacant(mut form) => {
            match (cmd, rest) {
                ("back", _) => return Ok(Screen::Grid),
                ("id", v) => form.patient_id = v.to_string(),
                ("name", v) => form.name = v.to_string(),
                ("age", v) => form.age = v.to_string(),
                ("sex", v) => match Sex::from_str(v) {
                    Some(sex) => form.sex = sex,
                    None => println!("sex: male or female"),
                },
                ("doctor", v) => form.doctor = v.to_string(),
                ("date", v) => form.admission_date = v.to_string(),
                ("admit", _) => {
                    if confirm("Admit this patient?")? {
                        match form.submit(db) {
                            Ok(AdmissionOutcome::Admitted) => {
                                println!("patient admitted");
                                return Ok(Screen::Detail(RoomDetail::load(db, &form.room_number)?));
                            }
                            Ok(AdmissionOutcome::TransferRequired { existing }) => {
                                let prompt = format!(
                                    "{} is already in room {}. Move them here?",
                                    existing.patient_id, existing.room_number
                                );
                                if confirm(&prompt)? {
                                    match form.confirm_transfer(db) {
                                        Ok(()) => {
                                            println!("patient moved");
                                            return Ok(Screen::Detail(RoomDetail::load(
                                                db,
                                                &form.room_number,
                                            )?));
                                        }
                                        Err(e) => println!("error: {}", e),
                                    }
                                }
                            }
                            Err(e) => println!("error: {}", e),
                        }
                    }
                }
                _ => println!("unknown command"),
            }
            Ok(Screen::Detail(RoomDetail::Vacant(form)))
        }
    }
}

// ---------------------------------------------------------------------------
// Input helpers
// ---------------------------------------------------------------------------

fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(char::is_whitespace) {
        Some((head, tail)) => (head, tail.trim()),
        None => (line, ""),
    }
}

/// Prompt and read one line; `None` on end of input.
fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line))
}

fn confirm(prompt: &str) -> Result<bool> {
    let answer = read_line(&format!("{} [y/N] ", prompt))?.unwrap_or_default();
    Ok(answer.trim().eq_ignore_ascii_case("y"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_command() {
        assert_eq!(split_command("doctor add Dr. Sato"), ("doctor", "add Dr. Sato"));
        assert_eq!(split_command("back"), ("back", ""));
        assert_eq!(split_command("rooms  1,2,3"), ("rooms", "1,2,3"));
    }
}
