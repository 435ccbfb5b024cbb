use chrono::Utc;
use log::*;
use password_auth::generate_hash;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set, TransactionTrait};

pub use entity::{
    activity_type, approval_requests, approval_status, approval_type, course_collaborators,
    course_modules, course_status, courses, departments, dynamic_category, dynamics,
    lesson_status, lessons, roles, users, Id,
};
pub use query::{IntoQueryFilterMap, QueryFilterMap};

pub mod approval_request;
pub mod course;
pub mod course_collaborator;
pub mod course_module;
pub mod department;
pub mod dynamic;
pub mod error;
pub mod lesson;
pub mod mutate;
pub mod query;
pub mod user;

/// Fills an empty database with a small, coherent data set: two departments,
/// one user per role, a course with modules and lessons that is waiting on a
/// manager's approval, and a few dynamics.
pub async fn seed_database(db: &DatabaseConnection) -> Result<(), error::Error> {
    let now = Utc::now();
    let txn = db.begin().await?;

    let people = departments::ActiveModel {
        name: Set("Pessoas & Cultura".to_owned()),
        description: Set(Some("Treinamentos de integração e liderança".to_owned())),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let sales = departments::ActiveModel {
        name: Set("Comercial".to_owned()),
        description: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let seed_user = |email: &str,
                     first: &str,
                     last: &str,
                     role: roles::Role,
                     department: Option<Id>| {
        users::ActiveModel {
            email: Set(email.to_owned()),
            first_name: Set(first.to_owned()),
            last_name: Set(last.to_owned()),
            display_name: Set(None),
            password: Set(generate_hash("password")),
            role: Set(role),
            department_id: Set(department),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
    };

    let _admin = seed_user("admin@example.com", "Admin", "User", roles::Role::Admin, None)
        .insert(&txn)
        .await?;
    let manager = seed_user(
        "marina.costa@example.com",
        "Marina",
        "Costa",
        roles::Role::Manager,
        Some(people.id),
    )
    .insert(&txn)
    .await?;
    let instructor = seed_user(
        "rafael.alves@example.com",
        "Rafael",
        "Alves",
        roles::Role::Instructor,
        Some(people.id),
    )
    .insert(&txn)
    .await?;
    let collaborator = seed_user(
        "julia.santos@example.com",
        "Júlia",
        "Santos",
        roles::Role::Collaborator,
        Some(sales.id),
    )
    .insert(&txn)
    .await?;

    let onboarding = courses::ActiveModel {
        name: Set("Integração de novos colaboradores".to_owned()),
        description: Set(Some("Primeira semana na empresa".to_owned())),
        objectives: Set(Some("Apresentar cultura, ferramentas e processos".to_owned())),
        target_audience: Set(Some("Novos colaboradores".to_owned())),
        estimated_duration: Set(0),
        status: Set(course_status::CourseStatus::InApproval),
        tags: Set(vec!["onboarding".to_owned(), "cultura".to_owned()]),
        creator_id: Set(instructor.id),
        department_id: Set(Some(people.id)),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    course_collaborator::set_collaborators(
        &txn,
        onboarding.id,
        instructor.id,
        &[collaborator.id],
    )
    .await?;

    let outline: [(&str, &[(&str, i32, activity_type::ActivityType)]); 2] = [
        (
            "Boas-vindas",
            &[
                ("Quebra-gelo", 15, activity_type::ActivityType::Dinamica),
                ("Nossa história", 30, activity_type::ActivityType::Apresentacao),
            ],
        ),
        (
            "Ferramentas",
            &[
                ("Tour pelos sistemas", 45, activity_type::ActivityType::Video),
                ("Primeiros passos", 60, activity_type::ActivityType::Exercicio),
            ],
        ),
    ];

    for (module_position, (module_title, module_lessons)) in (0..).zip(outline) {
        let module = course_modules::ActiveModel {
            course_id: Set(onboarding.id),
            title: Set(module_title.to_owned()),
            description: Set(None),
            position: Set(module_position),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (lesson_position, (title, duration, activity_type)) in (0..).zip(module_lessons) {
            lessons::ActiveModel {
                module_id: Set(module.id),
                title: Set((*title).to_owned()),
                description: Set(None),
                duration: Set(*duration),
                activity_type: Set(*activity_type),
                status: Set(lesson_status::LessonStatus::Todo),
                notes: Set(None),
                position: Set(lesson_position),
                created_at: Set(now.into()),
                updated_at: Set(now.into()),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }
    course::refresh_estimated_duration(&txn, onboarding.id).await?;

    approval_requests::ActiveModel {
        course_id: Set(onboarding.id),
        requester_id: Set(instructor.id),
        approver_id: Set(manager.id),
        request_type: Set(approval_type::ApprovalType::Course),
        target_item_id: Set(None),
        status: Set(approval_status::ApprovalStatus::Pending),
        comments: Set(Some("Pronto para revisão".to_owned())),
        reviewed_at: Set(None),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let seed_dynamic = |title: &str,
                        description: &str,
                        category: dynamic_category::DynamicCategory,
                        participants: (Option<i32>, Option<i32>),
                        duration: i32,
                        tags: &[&str]| dynamics::ActiveModel {
        title: Set(title.to_owned()),
        description: Set(description.to_owned()),
        objective: Set(None),
        category: Set(category),
        min_participants: Set(participants.0),
        max_participants: Set(participants.1),
        duration: Set(duration),
        materials: Set(None),
        instructions: Set(None),
        tags: Set(tags.iter().map(|tag| (*tag).to_owned()).collect()),
        created_by: Set(instructor.id),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    for dynamic in [
        seed_dynamic(
            "Teia de apresentações",
            "Cada pessoa se apresenta e passa o novelo adiante",
            dynamic_category::DynamicCategory::Icebreaker,
            (Some(5), Some(25)),
            15,
            &["presencial", "integração"],
        ),
        seed_dynamic(
            "Contagem coletiva",
            "O grupo conta até vinte sem combinar a ordem",
            dynamic_category::DynamicCategory::Energizer,
            (Some(6), None),
            10,
            &["remoto", "foco"],
        ),
        seed_dynamic(
            "Ponte de papel",
            "Equipes constroem uma ponte apenas com folhas de papel",
            dynamic_category::DynamicCategory::TeamBuilding,
            (Some(4), Some(30)),
            40,
            &["presencial", "colaboração"],
        ),
        seed_dynamic(
            "Uma palavra",
            "Cada participante resume o encontro em uma palavra",
            dynamic_category::DynamicCategory::Closing,
            (None, None),
            5,
            &["remoto"],
        ),
    ] {
        dynamic.insert(&txn).await?;
    }

    txn.commit().await?;
    info!("Seeded the database");
    Ok(())
}
