mod sky_tests;
