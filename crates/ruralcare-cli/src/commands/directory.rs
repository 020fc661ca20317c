use chrono::{DateTime, NaiveDate, Utc};
use ruralcare_api_models::{
    DoctorCreate, GeoPoint, MedicalStockCreate, UserCreate, WaterQualitySampleCreate,
};
use ruralcare_dashboard::DashboardApi;
use serde::Serialize;

use crate::cli::{
    AddDoctorArgs, AddStockArgs, AddUserArgs, AddWaterArgs, LocationArgs, OutputFormat,
};
use crate::client::{AppContext, CliError, CliResult};
use crate::output::{format_users, to_json};

fn geo_point(location: LocationArgs) -> CliResult<GeoPoint> {
    if !(-90.0..=90.0).contains(&location.lat) || !(-180.0..=180.0).contains(&location.lng) {
        return Err(CliError::validation(format!(
            "coordinates ({}, {}) are out of range",
            location.lat, location.lng
        )));
    }
    Ok(GeoPoint {
        lat: location.lat,
        lng: location.lng,
        address: location
            .address
            .map(|address| address.trim().to_string())
            .filter(|address| !address.is_empty()),
    })
}

fn required(field: &str, value: String) -> CliResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CliError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn parse_expiry(raw: &str) -> CliResult<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|err| {
        CliError::validation(format!("expiry date '{raw}' is not YYYY-MM-DD: {err}"))
    })?;
    date.and_hms_opt(0, 0, 0)
        .map(|moment| moment.and_utc())
        .ok_or_else(|| CliError::validation(format!("expiry date '{raw}' is out of range")))
}

fn print_created<T: Serialize>(
    label: &str,
    id: &str,
    value: &T,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => println!("{}", to_json(value)?),
        OutputFormat::Table => println!("{label} recorded: {id}"),
    }
    Ok(())
}

pub(crate) async fn handle_add_water(
    ctx: &AppContext,
    args: AddWaterArgs,
    format: OutputFormat,
) -> CliResult<()> {
    if !(0.0..=14.0).contains(&args.ph) {
        return Err(CliError::validation("pH must be between 0 and 14"));
    }
    if args.tds < 0.0 || args.turbidity < 0.0 || args.chlorine < 0.0 {
        return Err(CliError::validation("measurements must not be negative"));
    }
    let payload = WaterQualitySampleCreate {
        location: geo_point(args.location)?,
        tds_value: args.tds,
        ph_level: args.ph,
        turbidity: args.turbidity,
        chlorine_level: args.chlorine,
        tested_by: required("tested_by", args.tested_by)?,
    };
    let sample = ctx.api.create_water_sample(&payload).await?;
    print_created(
        &format!("water sample ({})", sample.status.as_str()),
        &sample.id,
        &sample,
        format,
    )
}

pub(crate) async fn handle_add_doctor(
    ctx: &AppContext,
    args: AddDoctorArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let payload = DoctorCreate {
        name: required("name", args.name)?,
        specialization: required("specialization", args.specialization)?,
        location: geo_point(args.location)?,
        phone: required("phone", args.phone)?,
        email: required("email", args.email)?,
        availability: required("availability", args.availability)?,
        clinic_name: args
            .clinic
            .map(|clinic| clinic.trim().to_string())
            .filter(|clinic| !clinic.is_empty()),
    };
    let doctor = ctx.api.create_doctor(&payload).await?;
    print_created("doctor", &doctor.id, &doctor, format)
}

pub(crate) async fn handle_add_stock(
    ctx: &AppContext,
    args: AddStockArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let payload = MedicalStockCreate {
        item_name: required("item", args.item)?,
        quantity: i64::from(args.quantity),
        unit: required("unit", args.unit)?,
        location: geo_point(args.location)?,
        expiry_date: args.expires.as_deref().map(parse_expiry).transpose()?,
    };
    let item = ctx.api.create_stock_item(&payload).await?;
    print_created(
        &format!("stock item ({})", item.status.as_str()),
        &item.id,
        &item,
        format,
    )
}

pub(crate) async fn handle_add_user(
    ctx: &AppContext,
    args: AddUserArgs,
    format: OutputFormat,
) -> CliResult<()> {
    let email = required("email", args.email)?;
    if !email.contains('@') {
        return Err(CliError::validation(format!(
            "email '{email}' is not an address"
        )));
    }
    let payload = UserCreate {
        name: required("name", args.name)?,
        email,
        role: args.role.into(),
        location: geo_point(args.location)?,
        phone: args
            .phone
            .map(|phone| phone.trim().to_string())
            .filter(|phone| !phone.is_empty()),
    };
    let user = ctx.api.create_user(&payload).await?;
    print_created(
        &format!("user ({})", user.role.as_str()),
        &user.id,
        &user,
        format,
    )
}

pub(crate) async fn handle_list_users(ctx: &AppContext, format: OutputFormat) -> CliResult<()> {
    let users = ctx.api.fetch_users().await?;
    match format {
        OutputFormat::Json => println!("{}", to_json(&users)?),
        OutputFormat::Table => print!("{}", format_users(&users)),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::UserRoleArg;
    use httpmock::prelude::*;
    use ruralcare_dashboard::DashboardConfig;
    use serde_json::json;

    fn context(server: &MockServer) -> AppContext {
        let config = DashboardConfig::from_url(&server.base_url()).expect("config");
        AppContext::with_config(config).expect("context")
    }

    fn location() -> LocationArgs {
        LocationArgs {
            lat: 28.61,
            lng: 77.21,
            address: Some("  ".into()),
        }
    }

    #[test]
    fn expiry_parses_calendar_dates() {
        let expiry = parse_expiry("2026-03-31").expect("valid date");
        assert_eq!(expiry.to_rfc3339(), "2026-03-31T00:00:00+00:00");
        assert_eq!(
            parse_expiry("31/03/2026").expect_err("bad format").exit_code(),
            2
        );
    }

    #[test]
    fn blank_address_is_dropped() {
        let point = geo_point(location()).expect("in range");
        assert!(point.address.is_none());
        let far = LocationArgs {
            lat: 120.0,
            ..location()
        };
        assert!(geo_point(far).is_err());
    }

    #[tokio::test]
    async fn stock_item_posts_payload() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/medical-stock").json_body(json!({
                "item_name": "Zinc tablets",
                "quantity": 120,
                "unit": "strips",
                "location": {"lat": 28.61, "lng": 77.21},
                "expiry_date": "2026-03-31T00:00:00.000000Z"
            }));
            then.status(200).json_body(json!({
                "id": "s-7",
                "item_name": "Zinc tablets",
                "quantity": 120,
                "unit": "strips",
                "status": "adequate",
                "last_updated": "2025-01-14T09:30:00Z"
            }));
        });

        handle_add_stock(
            &context(&server),
            AddStockArgs {
                location: location(),
                item: " Zinc tablets ".into(),
                quantity: 120,
                unit: "strips".into(),
                expires: Some("2026-03-31".into()),
            },
            OutputFormat::Table,
        )
        .await
        .expect("stock recorded");
        mock.assert();
    }

    #[tokio::test]
    async fn water_sample_rejects_impossible_ph() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/water-quality");
            then.status(200);
        });

        let err = handle_add_water(
            &context(&server),
            AddWaterArgs {
                location: location(),
                tds: 300.0,
                ph: 15.0,
                turbidity: 1.0,
                chlorine: 0.2,
                tested_by: "ASHA worker".into(),
            },
            OutputFormat::Json,
        )
        .await
        .expect_err("invalid pH");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn doctor_conflict_is_a_validation_error() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/doctors");
            then.status(409)
                .json_body(json!({"detail": "Doctor already registered"}));
        });

        let err = handle_add_doctor(
            &context(&server),
            AddDoctorArgs {
                location: location(),
                name: "Dr. Rao".into(),
                specialization: "Paediatrics".into(),
                phone: "+91 99999 00000".into(),
                email: "rao@example.org".into(),
                availability: "available".into(),
                clinic: None,
            },
            OutputFormat::Table,
        )
        .await
        .expect_err("conflict");
        assert_eq!(err.exit_code(), 2);
        assert!(err.display_message().contains("already registered"));
    }

    #[tokio::test]
    async fn user_registration_posts_role() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/users").json_body(json!({
                "name": "Ravi Kumar",
                "email": "ravi@example.org",
                "role": "government",
                "location": {"lat": 28.61, "lng": 77.21}
            }));
            then.status(200).json_body(json!({
                "id": "u-3",
                "name": "Ravi Kumar",
                "email": "ravi@example.org",
                "role": "government",
                "location": {"lat": 28.61, "lng": 77.21},
                "created_at": "2025-01-14T09:30:00Z"
            }));
        });

        handle_add_user(
            &context(&server),
            AddUserArgs {
                location: location(),
                name: "Ravi Kumar".into(),
                email: " ravi@example.org ".into(),
                role: UserRoleArg::Government,
                phone: Some(" ".into()),
            },
            OutputFormat::Table,
        )
        .await
        .expect("user registered");
        mock.assert();
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_locally() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/users");
            then.status(200);
        });

        let err = handle_add_user(
            &context(&server),
            AddUserArgs {
                location: location(),
                name: "Ravi".into(),
                email: "ravi.example.org".into(),
                role: UserRoleArg::Citizen,
                phone: None,
            },
            OutputFormat::Json,
        )
        .await
        .expect_err("bad email");
        assert_eq!(err.exit_code(), 2);
        assert_eq!(mock.calls(), 0);
    }

    #[tokio::test]
    async fn users_are_listed() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/users");
            then.status(200).json_body(json!([{
                "id": "u-1",
                "name": "Sunita Devi",
                "email": "sunita@example.org",
                "role": "citizen",
                "location": {"lat": 25.3, "lng": 82.9},
                "created_at": "2025-01-10T08:00:00"
            }]));
        });

        handle_list_users(&context(&server), OutputFormat::Table)
            .await
            .expect("users listed");
        mock.assert();
    }
}
