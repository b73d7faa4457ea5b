use chrono::{Datelike, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};

use dentalAgenda::forms::text::{long_datetime_text, short_date_text, slot_time_text};
use dentalAgenda::forms::{AppointmentForm, DEFAULT_END, DEFAULT_START, EditAppointmentForm};
use dentalAgenda::models::appointment::{Appointment, AppointmentStatus};
use dentalAgenda::service::appointment_store::DEFAULT_CANCELLATION_REASON;
use dentalAgenda::state::AppState;
use dentalAgenda::views::list::{ListFilter, ListScope, filter_appointments};
use dentalAgenda::views::month::month_grid;
use dentalAgenda::views::week::{ALL_HOURS, WORKING_HOURS, week_grid};
use dentalAgenda::views::{day::day_schedule, day_stats};

#[derive(Parser)]
#[command(name = "dentalAgenda", about = "Agenda de turnos del consultorio")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    Login {
        #[arg(long)]
        user: Option<String>,
    },
    Logout,
    Whoami,
    /// Appointments of a day (or week); --status/--search search everything.
    List {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        week: bool,
        #[arg(long)]
        status: Option<AppointmentStatus>,
        #[arg(long)]
        search: Option<String>,
    },
    Month {
        /// YYYY-MM
        #[arg(long)]
        month: Option<String>,
    },
    Week {
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        all_hours: bool,
    },
    Day {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Create {
        #[arg(long)]
        phone: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, default_value = DEFAULT_START)]
        start: String,
        #[arg(long, default_value = DEFAULT_END)]
        end: String,
        #[arg(long)]
        professional: Option<String>,
    },
    Edit {
        id: i64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
        #[arg(long)]
        professional: Option<String>,
        #[arg(long)]
        status: Option<AppointmentStatus>,
    },
    Status {
        id: i64,
        status: AppointmentStatus,
    },
    Cancel {
        id: i64,
        #[arg(long, default_value = DEFAULT_CANCELLATION_REASON)]
        reason: String,
    },
    Delete {
        id: i64,
    },
    Slots {
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    Book {
        slot: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        phone: String,
    },
    Clients,
    Availability {
        #[arg(long)]
        employee: i64,
    },
    Exceptions {
        #[arg(long)]
        employee: i64,
    },
    EventTypes {
        #[arg(long)]
        employee: i64,
    },
}

pub async fn cli(state: &mut AppState) -> bool {
    // Fine to exit here on bad arguments
    let cli = Cli::parse();
    let ok = match cli.command {
        Commands::Login { user } => login(state, user).await,
        Commands::Logout => {
            state.logout().await;
            println!("Sesión cerrada");
            true
        }
        command => {
            if !state.auth.restore().await {
                match state.auth.snapshot().await.error {
                    Some(error) => println!("{}", error),
                    None => println!("No hay sesión activa. Ejecutá `dentalAgenda login`."),
                }
                state.take_session_expired().await;
                return false;
            }
            run(state, command).await
        }
    };
    if state.take_session_expired().await {
        println!("Sesión expirada. Ejecutá `dentalAgenda login` para ingresar nuevamente.");
        return false;
    }
    ok
}

async fn login(state: &AppState, user: Option<String>) -> bool {
    let username = match user {
        Some(user) => user,
        None => match Text::new("Usuario:").prompt() {
            Ok(user) => user,
            Err(_) => return false,
        },
    };
    let password = match Password::new("Contraseña:").without_confirmation().prompt() {
        Ok(password) => password,
        Err(_) => return false,
    };
    if state.auth.login(&username, &password).await {
        if let Some(user) = state.auth.user().await {
            println!("Bienvenido/a, {}", user.login);
        }
        true
    } else {
        report_error(state.auth.snapshot().await.error);
        false
    }
}

async fn run(state: &AppState, command: Commands) -> bool {
    let today = Utc::now().with_timezone(&state.settings.timezone).date_naive();
    match command {
        Commands::Whoami => match state.auth.user().await {
            Some(user) => {
                println!("{} <{}> (id {}, rol {})", user.login, user.email, user.id, user.rol);
                true
            }
            None => false,
        },
        Commands::List { date, week, status, search } => {
            if !load_appointments(state).await {
                return false;
            }
            let date = date.unwrap_or(today);
            let filter = ListFilter {
                scope: if week { ListScope::Week(date) } else { ListScope::Day(date) },
                status,
                search,
            };
            let appointments = state.appointments.appointments().await;
            let listed = filter_appointments(&appointments, &filter);
            let noun = if listed.len() == 1 { "turno" } else { "turnos" };
            println!("{} {}", listed.len(), noun);
            for appt in listed {
                print_appointment(appt);
            }
            true
        }
        Commands::Month { month } => {
            let anchor = match month {
                Some(month) => match NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d") {
                    Ok(date) => date,
                    Err(_) => {
                        println!("Mes inválido `{}`, se espera YYYY-MM", month);
                        return false;
                    }
                },
                None => today,
            };
            if !load_appointments(state).await {
                return false;
            }
            let appointments = state.appointments.appointments().await;
            println!("Lun Mar Mié Jue Vie Sáb Dom");
            for week in month_grid(&appointments, anchor).chunks(7) {
                let line: String = week
                    .iter()
                    .map(|cell| {
                        if !cell.in_month {
                            return "  . ".to_string();
                        }
                        let marker = match cell.count {
                            0 => String::new(),
                            n if n > 9 => "+".to_string(),
                            n => n.to_string(),
                        };
                        format!("{:>2}{:<2}", cell.date.day(), marker)
                    })
                    .collect();
                println!("{}", line);
            }
            true
        }
        Commands::Week { date, all_hours } => {
            if !load_appointments(state).await {
                return false;
            }
            let appointments = state.appointments.appointments().await;
            let grid = week_grid(&appointments, date.unwrap_or(today));
            if grid.is_empty() {
                println!("Sin turnos esta semana");
                return true;
            }
            let hours = if all_hours { ALL_HOURS } else { WORKING_HOURS };
            for day in &grid.days {
                let key = day.format("%Y-%m-%d").to_string();
                let stats = day_stats(&appointments, &key);
                println!("== {} ({} turnos, {}h)", short_date_text(*day), stats.count, stats.hours);
                for hour in hours.clone() {
                    for appt in grid.slot(*day, hour) {
                        print_appointment(appt);
                    }
                }
            }
            true
        }
        Commands::Day { date } => {
            if !load_appointments(state).await {
                return false;
            }
            let date = date.unwrap_or(today);
            let appointments = state.appointments.appointments().await;
            println!("== {}", short_date_text(date));
            for (hour, bucket) in day_schedule(&appointments, date) {
                if bucket.is_empty() {
                    continue;
                }
                println!("{:02}:00", hour);
                for appt in bucket {
                    print_appointment(appt);
                }
            }
            true
        }
        Commands::Create { phone, name, date, start, end, professional } => {
            let mut form = AppointmentForm::new(
                date,
                professional.as_deref().unwrap_or(&state.settings.default_professional),
            );
            form.celular = phone.clone();
            form.horario_comienzo = start;
            form.horario_fin = end;
            match name {
                Some(name) => form.nombre = name,
                None => {
                    state.clients.fetch_clients().await;
                    match state.clients.find_by_phone(&phone).await {
                        Some(client) => form.select_client(&client),
                        None => match Text::new("Nombre del paciente:").prompt() {
                            Ok(name) => form.nombre = name,
                            Err(_) => return false,
                        },
                    }
                }
            }
            let payload = match form.to_payload() {
                Ok(payload) => payload,
                Err(err) => {
                    println!("{}", err);
                    return false;
                }
            };
            finish(state, state.appointments.create(&payload).await, "Turno creado exitosamente").await
        }
        Commands::Edit { id, name, phone, date, start, end, professional, status } => {
            if !load_appointments(state).await {
                return false;
            }
            let Some(existing) = state.appointments.appointment_by_id(id).await else {
                println!("No existe el turno #{}", id);
                return false;
            };
            let mut form = EditAppointmentForm::from_appointment(&existing);
            if let Some(name) = name {
                form.nombre = name;
            }
            if let Some(phone) = phone {
                form.celular = phone;
            }
            if let Some(date) = date {
                form.fecha = date.format("%Y-%m-%d").to_string();
            }
            if let Some(start) = start {
                form.horario_comienzo = start;
            }
            if let Some(end) = end {
                form.horario_fin = end;
            }
            if let Some(professional) = professional {
                form.nombre_peluquero = professional;
            }
            if let Some(status) = status {
                form.estado = status;
            }
            let payload = match form.to_payload() {
                Ok(payload) => payload,
                Err(err) => {
                    println!("{}", err);
                    return false;
                }
            };
            finish(state, state.appointments.update_full(id, &payload).await, "Turno actualizado").await
        }
        Commands::Status { id, status } => {
            let done = state.appointments.set_status(id, status).await;
            let message = if status == AppointmentStatus::Cancelled {
                "Turno cancelado"
            } else {
                "Estado del turno actualizado"
            };
            finish(state, done, message).await
        }
        Commands::Cancel { id, reason } => {
            finish(state, state.appointments.cancel(id, &reason).await, "Turno cancelado").await
        }
        Commands::Delete { id } => {
            finish(state, state.appointments.delete(id).await, "Turno eliminado").await
        }
        Commands::Slots { date } => {
            let date = date.unwrap_or(today);
            if !state.appointments.fetch_available_slots(date).await {
                report_error(state.appointments.error().await);
                return false;
            }
            let slots = state.appointments.available_slots().await;
            if slots.is_empty() {
                println!("No hay horarios disponibles para {}", short_date_text(date));
            }
            for slot in slots {
                println!("{}  {}", slot_time_text(&slot, state.settings.timezone), slot);
            }
            true
        }
        Commands::Book { slot, name, phone } => {
            let done = state.appointments.create_from_slot(&slot, &name, &phone).await;
            finish(state, done, "Turno reservado").await
        }
        Commands::Clients => {
            if !state.clients.fetch_clients().await {
                report_error(state.clients.snapshot().await.error);
                return false;
            }
            for client in state.clients.clients().await {
                println!("{} - {}", client.nombre, client.celular);
            }
            true
        }
        Commands::Availability { employee } => match state.schedules.disponibilidad(employee).await {
            Ok(response) => {
                let schedule = response.data.data;
                println!("{} ({})", schedule.name, schedule.time_zone);
                for window in schedule.availability {
                    println!("  {}: {}-{}", window.days.join(", "), window.start_time, window.end_time);
                }
                true
            }
            Err(err) => {
                println!("Error al cargar la disponibilidad: {}", err);
                false
            }
        },
        Commands::Exceptions { employee } => match state.schedules.excepciones(employee).await {
            Ok(response) => {
                for exception in response.data {
                    println!("{}", exception);
                }
                true
            }
            Err(err) => {
                println!("Error al cargar las excepciones: {}", err);
                false
            }
        },
        Commands::EventTypes { employee } => match state.schedules.tipos_evento(employee).await {
            Ok(response) => {
                for event_type in response.data.event_types.iter().filter(|t| !t.hidden) {
                    println!("#{} {} ({} min)", event_type.id, event_type.title, event_type.length);
                }
                true
            }
            Err(err) => {
                println!("Error al cargar los tipos de evento: {}", err);
                false
            }
        },
        Commands::Login { .. } | Commands::Logout => false,
    }
}

async fn load_appointments(state: &AppState) -> bool {
    if state.appointments.fetch_appointments().await {
        true
    } else {
        report_error(state.appointments.error().await);
        false
    }
}

async fn finish(state: &AppState, done: bool, success: &str) -> bool {
    if done {
        println!("{}", success);
    } else {
        report_error(state.appointments.error().await);
    }
    done
}

fn report_error(error: Option<String>) {
    println!("{}", error.unwrap_or("Error desconocido".to_string()));
}

fn print_appointment(appt: &Appointment) {
    let start = NaiveDate::parse_from_str(&appt.date, "%Y-%m-%d")
        .ok()
        .and_then(|date| {
            dentalAgenda::models::time::parse_hhmm(&appt.start_time).map(|t| date.and_time(t))
        })
        .map(|at| long_datetime_text(&at))
        .unwrap_or(format!("{} {}", appt.date, appt.start_time));
    println!(
        "  #{} {} a {}  {} ({})  [{}]  {}",
        appt.id, start, appt.end_time, appt.patient_name, appt.patient_phone, appt.status, appt.profesional
    );
}
