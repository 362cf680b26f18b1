use lms_gate::Role;
use yew::prelude::*;
use yew_router::prelude::*;

use crate::{logout, session::use_session, Route};

/// Menu entries per role; the guard still decides what may be opened.
fn nav_for(role: Role) -> Vec<(Route, &'static str)> {
    match role {
        Role::Admin => vec![
            (Route::AdminDashboard, "Tableau de bord"),
            (Route::AdminUsers, "Comptes"),
        ],
        Role::Supervisor => vec![
            (Route::SupervisorDashboard, "Tableau de bord"),
            (Route::SupervisorCourses, "Cours"),
            (Route::SupervisorUsers, "Stagiaires"),
            (Route::SupervisorSubjects, "Matières"),
            (Route::SupervisorTasks, "Tâches"),
            (Route::SupervisorCategories, "Catégories"),
        ],
        Role::Trainee => vec![
            (Route::TraineeCourses, "Mes cours"),
            (Route::TraineeReports, "Rapports"),
        ],
    }
}

#[derive(Properties, PartialEq)]
pub struct MainLayoutProps {
    #[prop_or_default]
    pub children: Children,
}

#[function_component(MainLayout)]
pub fn main_layout(props: &MainLayoutProps) -> Html {
    let session = use_session();
    let Some(s) = session.session() else {
        return Html::default();
    };

    html! {
        <>
            <header class="header">
                <div class="header-title">{"LMS"}</div>
                <div class="header-user">{ format!("{} ({})", s.identity.full_name, s.role()) }</div>
                <div class="header-logout">
                    <logout::Logout />
                </div>
            </header>

            <nav class="nav">
                <ul class="nav-list">
                    { for nav_for(s.role()).into_iter().map(|(route, label)| html! {
                        <li class="nav-item"><Link<Route> to={route}>{ label }</Link<Route>></li>
                    }) }
                </ul>
            </nav>

            <main class="main-content">
                { for props.children.iter() }
            </main>
        </>
    }
}
