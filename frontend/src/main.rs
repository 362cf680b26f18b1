use yew::prelude::*;
use yew_router::prelude::*;

mod api;
mod auth;
mod cookies;
mod guard;
mod layout;
mod logger;
mod logout;
mod pages;
mod session;
mod storage;

use guard::AuthGuard;
use session::SessionProvider;

/* -------------------- routing -------------------- */

#[derive(Routable, Clone, PartialEq, Debug)]
pub enum Route {
    // publiques
    #[at("/login")]
    Login,
    #[at("/register")]
    Register,
    #[at("/activate/:uidb64/:token")]
    Activate { uidb64: String, token: String },
    #[at("/resend-activation")]
    ResendActivation,
    #[at("/forgot-password")]
    ForgotPassword,

    // toute session
    #[at("/")]
    Home,

    // admin
    #[at("/admin/dashboard")]
    AdminDashboard,
    #[at("/admin/users")]
    AdminUsers,

    // supervisor
    #[at("/supervisor/dashboard")]
    SupervisorDashboard,
    #[at("/supervisor/courses")]
    SupervisorCourses,
    #[at("/supervisor/users")]
    SupervisorUsers,
    #[at("/supervisor/subjects")]
    SupervisorSubjects,
    #[at("/supervisor/tasks")]
    SupervisorTasks,
    #[at("/supervisor/categories")]
    SupervisorCategories,

    // trainee
    #[at("/trainee/courses")]
    TraineeCourses,
    #[at("/trainee/reports")]
    TraineeReports,

    #[not_found]
    #[at("/404")]
    NotFound,
}

fn switch(route: Route) -> Html {
    use layout::MainLayout;
    use pages::Placeholder;

    match route {
        Route::Login => html!(<auth::LoginForm />),
        Route::Register => html!(<Placeholder title="Inscription" />),
        Route::Activate { uidb64, token } => html!(<auth::Activate {uidb64} {token} />),
        Route::ResendActivation => html!(<auth::ResendActivation />),
        Route::ForgotPassword => html!(<Placeholder title="Mot de passe oublié" />),

        Route::Home => html!(<MainLayout><pages::Home /></MainLayout>),

        Route::AdminDashboard => html!(<MainLayout><Placeholder title="Tableau de bord admin" /></MainLayout>),
        Route::AdminUsers => html!(<MainLayout><Placeholder title="Comptes utilisateurs" /></MainLayout>),

        Route::SupervisorDashboard => html!(<MainLayout><Placeholder title="Tableau de bord superviseur" /></MainLayout>),
        Route::SupervisorCourses => html!(<MainLayout><Placeholder title="Cours" /></MainLayout>),
        Route::SupervisorUsers => html!(<MainLayout><Placeholder title="Stagiaires" /></MainLayout>),
        Route::SupervisorSubjects => html!(<MainLayout><Placeholder title="Matières" /></MainLayout>),
        Route::SupervisorTasks => html!(<MainLayout><Placeholder title="Tâches" /></MainLayout>),
        Route::SupervisorCategories => html!(<MainLayout><Placeholder title="Catégories" /></MainLayout>),

        Route::TraineeCourses => html!(<MainLayout><Placeholder title="Mes cours" /></MainLayout>),
        Route::TraineeReports => html!(<MainLayout><Placeholder title="Rapports quotidiens" /></MainLayout>),

        Route::NotFound => html!(<h1>{"404 – Not Found"}</h1>),
    }
}

/* -------------------- entry point ---------------- */

#[function_component(App)]
fn app() -> Html {
    html! {
        <BrowserRouter>
            <SessionProvider>
                <AuthGuard>
                    <Switch<Route> render={switch} />
                </AuthGuard>
            </SessionProvider>
        </BrowserRouter>
    }
}

fn main() {
    logger::init();
    yew::Renderer::<App>::new().render();
}
