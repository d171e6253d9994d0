//! Initial lesson catalog.

use rust_decimal::Decimal;

use crate::lesson::NewLesson;

/// Returns the lessons loaded into an empty store by the `seed` binary.
pub fn catalog() -> Vec<NewLesson> {
    vec![
        NewLesson::new(
            "Mobile App Development",
            "Birmingham",
            Decimal::new(8899, 2),
            10,
            "logo-mobile.svg",
            "Learn to build mobile applications for iOS and Android",
        ),
        NewLesson::new(
            "Artificial Intelligence & Machine Learning",
            "West-Ham",
            Decimal::new(14999, 2),
            8,
            "logo-ai-ml.svg",
            "Master AI and ML concepts with hands-on projects",
        ),
        NewLesson::new(
            "Cloud Computing with AWS or Azure Lab Course",
            "Newcastle",
            Decimal::new(9999, 2),
            5,
            "logo-cloud.svg",
            "Learn cloud infrastructure and services",
        ),
        NewLesson::new(
            "Cybersecurity Basics",
            "Bristol",
            Decimal::new(250, 0),
            5,
            "logo-cybersecurity.svg",
            "Essential cybersecurity principles and practices",
        ),
        NewLesson::new(
            "UI/UX Design Principles",
            "Brentford",
            Decimal::new(220, 0),
            5,
            "logo-figma.svg",
            "Create beautiful and user-friendly interfaces",
        ),
        NewLesson::new(
            "Project Management",
            "Manchester",
            Decimal::new(250, 0),
            5,
            "logo-jira.svg",
            "Master project management methodologies",
        ),
        NewLesson::new(
            "Computer Science",
            "Villa-park",
            Decimal::new(200, 0),
            10,
            "logo-compsci.svg",
            "Fundamentals of computer science and programming",
        ),
        NewLesson::new(
            "Database Design & SQL",
            "Leicester",
            Decimal::new(199, 0),
            7,
            "logo-database.svg",
            "Learn database design and SQL queries",
        ),
        NewLesson::new(
            "Backend Development with Node.js",
            "Norwich",
            Decimal::new(209, 0),
            5,
            "logo-node.svg",
            "Build scalable backend applications with Node.js",
        ),
        NewLesson::new(
            "Python Programming",
            "Liverpool",
            Decimal::new(150, 0),
            12,
            "logo-python.svg",
            "Learn Python programming from basics to advanced",
        ),
    ]
}
